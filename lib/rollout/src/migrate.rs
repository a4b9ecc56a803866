use gantry_client::entities::task_definition::TaskDefinition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
  /// The document cannot describe a runnable service.
  #[error("task definition document has no container definitions")]
  MalformedInput,

  /// The substitution target does not exist, so registering the
  /// document would silently deploy the old image.
  #[error("no container named '{name}' in the task definition")]
  ContainerNotFound { name: String },
}

/// Produce a registerable task definition from a running
/// service's current one: substitute `new_image` into the
/// container named `container_name` and clear the
/// provider-assigned metadata the control plane refuses on
/// registration.
///
/// Every other field is preserved verbatim, so the registered
/// revision differs from the previous one only in the image.
/// If multiple containers share the name (not expected), the
/// first match is substituted.
pub fn migrate(
  current: &TaskDefinition,
  new_image: &str,
  container_name: &str,
) -> Result<TaskDefinition, MigrateError> {
  if current.container_definitions.is_empty() {
    return Err(MigrateError::MalformedInput);
  }

  let mut next = current.clone();

  let container = next.container_mut(container_name).ok_or_else(
    || MigrateError::ContainerNotFound {
      name: container_name.to_string(),
    },
  )?;
  container.image = new_image.to_string();

  next.strip_provider_metadata();

  Ok(next)
}
