pub mod config;
pub mod environment;
pub mod image;
pub mod logger;
pub mod manifest;
pub mod service;
pub mod task_definition;
