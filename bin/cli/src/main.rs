#[macro_use]
extern crate tracing;

use gantry_client::entities::config::cli::Command;

mod aws;
mod command;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  let config = config::cli_config();
  logger::init(&config.logging)?;

  debug!("Gantry version: v{}", env!("CARGO_PKG_VERSION"));

  match &config::cli_args().command {
    Command::Deploy(args) => command::deploy::handle(args).await,
    Command::Manifest(args) => command::manifest::handle(args),
    Command::Environment(args) => {
      command::environment::handle(args)
    }
  }
}
