//! # Configuring Gantry
//!
//! Configuration is layered from three sources, highest
//! priority first:
//! 1. Command line args ([cli::CliArgs])
//! 2. Environment variables ([Env])
//! 3. The environments file (`environments.json`), holding the
//!    per-environment mapping
//!    ([crate::entities::environment::Environments]).

use std::path::PathBuf;

use serde::Deserialize;

use crate::entities::logger::{LogLevel, StdioLogMode};

pub mod cli;

/// # Gantry Environment Variables
///
/// Variables are passed in the traditional `UPPER_SNAKE_CASE`
/// format. Equivalent command line args take priority.
#[derive(Debug, Deserialize)]
pub struct Env {
  /// Path to the environments file.
  /// Default: `./environments.json`
  #[serde(default)]
  pub gantry_config_path: Option<PathBuf>,

  /// Default target environment when a command doesn't
  /// specify one.
  #[serde(default)]
  pub gantry_environment: Option<String>,

  /// Region passed through to the control plane CLI.
  /// Falls back to the ambient provider configuration.
  #[serde(default)]
  pub gantry_aws_region: Option<String>,

  #[serde(default)]
  pub gantry_logging_level: Option<LogLevel>,
  #[serde(default)]
  pub gantry_logging_stdio: Option<StdioLogMode>,
  #[serde(default)]
  pub gantry_logging_pretty: Option<bool>,
  #[serde(default)]
  pub gantry_logging_location: Option<bool>,
  #[serde(default)]
  pub gantry_logging_ansi: Option<bool>,
}
