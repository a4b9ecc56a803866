//! # Gantry client entities
//!
//! The shared data model for the Gantry deployment tool:
//! task definition documents as the control plane describes and
//! accepts them, image references and the image definitions
//! manifest passed between pipeline stages, per-environment
//! configuration, and the CLI / logging configuration types.

pub mod entities;
