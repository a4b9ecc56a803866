use colored::Colorize;
use gantry_client::entities::config::cli::Environment;

use crate::config;

pub fn handle(
  Environment { name, list }: &Environment,
) -> anyhow::Result<()> {
  let environments = config::environments()?;

  if *list {
    for (name, env) in &environments.0 {
      println!(
        "{} cluster: {} | service: {} | cpu: {} | memory: {} | desired: {}{}",
        format!("{name:>8}").bold(),
        env.cluster_name,
        env.service_name,
        env.cpu,
        env.memory,
        env.desired_count,
        if env.https_ingress { " | https" } else { "" },
      );
    }
    return Ok(());
  }

  let name = name
    .as_deref()
    .unwrap_or(&config::cli_config().default_environment);
  let resolved = environments.resolve(name)?;
  println!("{}", serde_json::to_string_pretty(resolved)?);
  Ok(())
}
