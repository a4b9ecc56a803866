use std::path::PathBuf;

use clap::Parser;

/// # Gantry Command Line Arguments
///
/// Example:
/// ```sh
/// gantry deploy \
///   --environment prod \
///   --manifest imagedefinitions.json \
///   --poll-interval 15 \
///   --timeout 600
/// ```
#[derive(Debug, Parser)]
#[command(name = "gantry", about, version)]
pub struct CliArgs {
  #[command(subcommand)]
  pub command: Command,

  /// Path to the environments file.
  /// Default: `./environments.json`
  #[arg(long, short = 'c')]
  pub config_path: Option<PathBuf>,

  /// Configure the logging level: error, warn, info, debug,
  /// trace. If passed, will override any other log level set.
  #[arg(long)]
  pub log_level: Option<tracing::Level>,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
  /// Roll an environment's service onto a new image. (alias: `d`)
  #[clap(alias = "d")]
  Deploy(Deploy),

  /// Write the image definitions manifest for a built image.
  /// (alias: `m`)
  #[clap(alias = "m")]
  Manifest(Manifest),

  /// Print the resolved configuration for an environment.
  /// (alias: `e`)
  #[clap(alias = "e")]
  Environment(Environment),
}

#[derive(Debug, Clone, clap::Parser)]
pub struct Deploy {
  /// The target environment. Default: `dev`
  #[arg(long, short = 'e')]
  pub environment: Option<String>,

  /// Deploy this exact image URI instead of reading the
  /// manifest.
  #[arg(long, short = 'i')]
  pub image: Option<String>,

  /// Path to the image definitions manifest.
  /// Default: `./imagedefinitions.json`
  #[arg(long, short = 'm')]
  pub manifest: Option<PathBuf>,

  /// Override the container to substitute. Default comes from
  /// the environment config.
  #[arg(long)]
  pub container: Option<String>,

  /// Seconds between service stability polls.
  #[arg(long, default_value_t = 15)]
  pub poll_interval: u64,

  /// Max seconds to wait for the service to stabilize before
  /// the rollout is reported failed.
  #[arg(long, default_value_t = 600)]
  pub timeout: u64,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct Manifest {
  /// Logical container name. Must match the container name in
  /// the target task definition. Defaults to the environment's
  /// configured container name.
  #[arg(long, short = 'n')]
  pub name: Option<String>,

  /// The environment whose container name to use when `--name`
  /// is not passed. Default: `dev`
  #[arg(long, short = 'e')]
  pub environment: Option<String>,

  /// Full image URI (`repository[:tag]`).
  #[arg(long, conflicts_with_all = ["repository", "commit"])]
  pub image_uri: Option<String>,

  /// Repository URI. The tag is the short commit hash from
  /// `--commit`, or `latest`.
  #[arg(long)]
  pub repository: Option<String>,

  /// Commit hash, shortened to 7 characters for the tag.
  #[arg(long)]
  pub commit: Option<String>,

  /// Output path. Default: `./imagedefinitions.json`
  #[arg(long, short = 'o')]
  pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct Environment {
  /// The environment to resolve. Default: `dev`
  pub name: Option<String>,

  /// List every configured environment instead.
  #[arg(long, short = 'l')]
  pub list: bool,
}
