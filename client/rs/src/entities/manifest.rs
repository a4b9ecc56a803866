use std::path::Path;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

/// Canonical manifest file name, as produced by the build stage
/// and consumed by every later stage.
pub const IMAGE_DEFINITIONS_FILE: &str = "imagedefinitions.json";

/// One (logical container name, image URI) pair. The name must
/// exactly match the container name inside the target task
/// definition.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ImageDefinition {
  pub name: String,
  pub image_uri: String,
}

/// The hand-off artifact between the build stage and later
/// stages: a JSON array of [ImageDefinition], expected to hold
/// exactly one element.
///
/// ```json
/// [{"name":"app","imageUri":"repo/app:abc1234"}]
/// ```
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ImageDefinitionManifest(pub Vec<ImageDefinition>);

impl ImageDefinitionManifest {
  pub fn new(
    name: impl Into<String>,
    image_uri: impl Into<String>,
  ) -> ImageDefinitionManifest {
    ImageDefinitionManifest(vec![ImageDefinition {
      name: name.into(),
      image_uri: image_uri.into(),
    }])
  }

  /// The single image definition the manifest must contain.
  pub fn single(&self) -> anyhow::Result<&ImageDefinition> {
    match self.0.as_slice() {
      [definition] => Ok(definition),
      [] => Err(anyhow!("image definitions manifest is empty")),
      definitions => Err(anyhow!(
        "image definitions manifest has {} entries, expected exactly 1",
        definitions.len()
      )),
    }
  }

  pub fn read(path: &Path) -> anyhow::Result<ImageDefinitionManifest> {
    let contents =
      std::fs::read_to_string(path).with_context(|| {
        format!(
          "failed to read image definitions manifest at {}",
          path.display()
        )
      })?;
    serde_json::from_str(&contents).with_context(|| {
      format!(
        "failed to parse image definitions manifest at {}",
        path.display()
      )
    })
  }

  pub fn write(&self, path: &Path) -> anyhow::Result<()> {
    let contents = serde_json::to_string(self)
      .context("failed to serialize image definitions manifest")?;
    std::fs::write(path, contents).with_context(|| {
      format!(
        "failed to write image definitions manifest to {}",
        path.display()
      )
    })
  }
}
