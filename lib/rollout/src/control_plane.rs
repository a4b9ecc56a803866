use gantry_client::entities::{
  service::ServiceSnapshot,
  task_definition::{RegisteredTaskDefinition, TaskDefinition},
};

/// Seam to the cluster / service control plane. The real
/// implementation drives the provider CLI; tests substitute a
/// fake. Consumers are generic over it, no dyn.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
  async fn describe_service(
    &self,
    cluster: &str,
    service: &str,
  ) -> anyhow::Result<ServiceSnapshot>;

  async fn describe_task_definition(
    &self,
    task_definition: &str,
  ) -> anyhow::Result<TaskDefinition>;

  /// Registers a new immutable revision. Has no effect on
  /// running tasks until a service references it.
  async fn register_task_definition(
    &self,
    definition: &TaskDefinition,
  ) -> anyhow::Result<RegisteredTaskDefinition>;

  /// Points the service at the given definition, triggering the
  /// provider's rolling replacement.
  async fn update_service(
    &self,
    cluster: &str,
    service: &str,
    task_definition_arn: &str,
  ) -> anyhow::Result<()>;
}
