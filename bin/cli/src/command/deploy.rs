use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use colored::Colorize;
use gantry_client::entities::{
  config::cli::Deploy,
  manifest::{IMAGE_DEFINITIONS_FILE, ImageDefinitionManifest},
};
use rollout::{ControlPlane, DeploymentOutcome};

use crate::{aws::AwsCli, config};

pub async fn handle(
  Deploy {
    environment,
    image,
    manifest,
    container,
    poll_interval,
    timeout,
  }: &Deploy,
) -> anyhow::Result<()> {
  let environments = config::environments()?;
  let environment = environment
    .as_deref()
    .unwrap_or(&config::cli_config().default_environment);
  let env = environments.resolve(environment)?;

  let container_name =
    container.as_deref().unwrap_or(&env.container_name);

  let image = match image {
    Some(image) => image.clone(),
    None => {
      let path = manifest
        .clone()
        .unwrap_or_else(|| PathBuf::from(IMAGE_DEFINITIONS_FILE));
      let manifest = ImageDefinitionManifest::read(&path)?;
      let definition = manifest.single()?;
      // A name mismatch would register a definition that
      // ignores the freshly built image.
      if definition.name != container_name {
        bail!(
          "manifest is for container '{}', but the target container is '{container_name}'",
          definition.name
        );
      }
      definition.image_uri.clone()
    }
  };

  let control_plane =
    AwsCli::new(config::cli_config().aws_region.clone());

  info!(
    "deploying {image} to service {} in cluster {}",
    env.service_name, env.cluster_name
  );

  let current_arn = control_plane
    .describe_service(&env.cluster_name, &env.service_name)
    .await
    .context(
      "failed to look up the service's current task definition",
    )?
    .task_definition;
  debug!("current task definition: {current_arn}");

  let current = control_plane
    .describe_task_definition(&current_arn)
    .await
    .context("failed to describe the current task definition")?;

  let next = rollout::migrate(&current, &image, container_name)?;

  match rollout::deploy(
    &control_plane,
    &next,
    &env.cluster_name,
    &env.service_name,
    Duration::from_secs(*poll_interval),
    Duration::from_secs(*timeout),
  )
  .await
  {
    DeploymentOutcome::Stable(registered) => {
      println!(
        "{} service {} is stable on {registered}",
        "deployed".green().bold(),
        env.service_name
      );
      Ok(())
    }
    DeploymentOutcome::Failed(e) => {
      println!("{}", "rollout failed".red().bold());
      Err(e.into())
    }
  }
}
