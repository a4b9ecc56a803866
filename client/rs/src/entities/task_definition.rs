use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the control plane assigns when a task definition is
/// registered. They come back on describe, but are rejected or
/// ignored if echoed into a fresh registration, so they must be
/// cleared before a modified document is resubmitted.
pub const PROVIDER_ASSIGNED_FIELDS: [&str; 8] = [
  "taskDefinitionArn",
  "revision",
  "status",
  "requiresAttributes",
  "placementConstraints",
  "compatibilities",
  "registeredAt",
  "registeredBy",
];

/// A task definition document, as returned by
/// `describe-task-definition` and accepted by
/// `register-task-definition`.
///
/// Only the containers and the provider-assigned metadata are
/// modeled. Everything else (family, cpu, memory, networkMode,
/// executionRoleArn, volumes, ...) is carried in [Self::extra] and
/// round-trips verbatim, so documents with fields this tool has
/// never heard of still re-register unchanged.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
  /// The containers this definition runs.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub container_definitions: Vec<ContainerDefinition>,

  /// Assigned on registration.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub task_definition_arn: Option<String>,

  /// Assigned on registration, monotonically increasing.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub revision: Option<i64>,

  /// ACTIVE / INACTIVE.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,

  /// Capability attributes derived by the provider.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub requires_attributes: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub placement_constraints: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub compatibilities: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub registered_at: Option<Value>,

  /// Principal that registered the definition.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub registered_by: Option<String>,

  /// All other fields, preserved untouched.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl TaskDefinition {
  /// The first container with the given name, if any.
  pub fn container(
    &self,
    name: &str,
  ) -> Option<&ContainerDefinition> {
    self
      .container_definitions
      .iter()
      .find(|container| container.name == name)
  }

  pub fn container_mut(
    &mut self,
    name: &str,
  ) -> Option<&mut ContainerDefinition> {
    self
      .container_definitions
      .iter_mut()
      .find(|container| container.name == name)
  }

  /// Clear every field in [PROVIDER_ASSIGNED_FIELDS]. After this
  /// the document serializes to a registerable input.
  pub fn strip_provider_metadata(&mut self) {
    self.task_definition_arn = None;
    self.revision = None;
    self.status = None;
    self.requires_attributes = None;
    self.placement_constraints = None;
    self.compatibilities = None;
    self.registered_at = None;
    self.registered_by = None;
  }
}

/// One container entry inside a [TaskDefinition]. Port mappings,
/// environment, logging configuration and the rest ride along in
/// [Self::extra].
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
pub struct ContainerDefinition {
  /// The logical container name. The image definitions manifest
  /// must use this exact name for substitution to apply.
  #[serde(default)]
  pub name: String,

  /// The image reference the container runs.
  #[serde(default)]
  pub image: String,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Identifier handed back by the control plane after a successful
/// `register-task-definition`.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTaskDefinition {
  pub task_definition_arn: String,
  pub revision: i64,
}

impl std::fmt::Display for RegisteredTaskDefinition {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(
      f,
      "{} (revision {})",
      self.task_definition_arn, self.revision
    )
  }
}
