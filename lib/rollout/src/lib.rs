//! Core of the Gantry deployment tool.
//!
//! Two stages compose a deployment, invoked sequentially with no
//! concurrency between them:
//!
//! 1. [migrate] takes the service's current task definition and a
//!    new image reference, and produces a fresh, registerable
//!    document.
//! 2. [deploy] registers that document, points the service at the
//!    new revision, and blocks until the service reports steady
//!    state (or the wait times out).
//!
//! Everything past the [ControlPlane] seam (rolling replacement,
//! health checking, autoscaling) belongs to the provider.

mod control_plane;
mod deploy;
mod migrate;

pub use control_plane::ControlPlane;
pub use deploy::{
  DeploymentOutcome, RolloutError, RolloutState, deploy,
};
pub use migrate::{MigrateError, migrate};
