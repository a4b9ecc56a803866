use std::path::PathBuf;

use anyhow::bail;
use colored::Colorize;
use gantry_client::entities::{
  config::cli::Manifest,
  image::ImageReference,
  manifest::{IMAGE_DEFINITIONS_FILE, ImageDefinitionManifest},
};

use crate::config;

pub fn handle(
  Manifest {
    name,
    environment,
    image_uri,
    repository,
    commit,
    output,
  }: &Manifest,
) -> anyhow::Result<()> {
  let name = match name {
    Some(name) => name.clone(),
    None => {
      let environments = config::environments()?;
      let environment = environment
        .as_deref()
        .unwrap_or(&config::cli_config().default_environment);
      environments
        .resolve(environment)?
        .container_name
        .clone()
    }
  };

  let image = match (image_uri, repository) {
    (Some(uri), _) => uri.parse::<ImageReference>()?,
    (None, Some(repository)) => {
      ImageReference::from_commit(repository, commit.as_deref())
    }
    (None, None) => {
      bail!("either --image-uri or --repository is required")
    }
  };

  let path = output
    .clone()
    .unwrap_or_else(|| PathBuf::from(IMAGE_DEFINITIONS_FILE));
  ImageDefinitionManifest::new(&name, image.uri())
    .write(&path)?;

  println!(
    "{} {} -> {} ({})",
    "wrote".green().bold(),
    name,
    image,
    path.display()
  );
  Ok(())
}
