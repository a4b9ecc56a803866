use std::{path::PathBuf, sync::OnceLock};

use clap::Parser;
use gantry_client::entities::{
  config::{Env, cli::CliArgs},
  environment::{Environments, FALLBACK_ENVIRONMENT},
  logger::{LogConfig, LogLevel},
};

pub fn cli_args() -> &'static CliArgs {
  static CLI_ARGS: OnceLock<CliArgs> = OnceLock::new();
  CLI_ARGS.get_or_init(CliArgs::parse)
}

#[derive(Debug)]
pub struct CliConfig {
  /// Path to the environments file.
  pub environments_path: PathBuf,
  /// Environment used when a command doesn't name one.
  pub default_environment: String,
  /// Region forwarded to the control plane CLI.
  pub aws_region: Option<String>,
  pub logging: LogConfig,
}

pub fn cli_config() -> &'static CliConfig {
  static CLI_CONFIG: OnceLock<CliConfig> = OnceLock::new();
  CLI_CONFIG.get_or_init(|| {
    let env: Env = envy::from_env()
      .expect("failed to parse gantry environment");
    let args = cli_args();

    CliConfig {
      environments_path: args
        .config_path
        .clone()
        .or(env.gantry_config_path)
        .unwrap_or_else(|| PathBuf::from("environments.json")),
      default_environment: env
        .gantry_environment
        .unwrap_or_else(|| FALLBACK_ENVIRONMENT.to_string()),
      aws_region: env.gantry_aws_region,
      logging: LogConfig {
        level: args
          .log_level
          .map(LogLevel::from)
          .or(env.gantry_logging_level)
          .unwrap_or_default(),
        stdio: env.gantry_logging_stdio.unwrap_or_default(),
        pretty: env.gantry_logging_pretty.unwrap_or(false),
        location: env.gantry_logging_location.unwrap_or(false),
        ansi: env.gantry_logging_ansi.unwrap_or(true),
      },
    }
  })
}

pub fn environments() -> anyhow::Result<Environments> {
  Environments::read(&cli_config().environments_path)
}
