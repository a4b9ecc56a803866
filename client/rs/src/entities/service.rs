use serde::{Deserialize, Serialize};

/// Point-in-time view of a service, as reported by the control
/// plane's `describe-services`.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSnapshot {
  /// The task definition the primary deployment targets.
  pub task_definition: String,
  pub desired_count: i64,
  pub running_count: i64,
  /// Number of in-flight deployments. Settles to 1 once the
  /// rolling replacement has drained the previous revision.
  pub deployments: usize,
}

impl ServiceSnapshot {
  /// Stability predicate used by the rollout wait: the primary
  /// deployment runs the given definition, every desired task is
  /// running, and the old deployment has fully drained. Matches
  /// the provider's own `services-stable` waiter.
  pub fn is_stable_on(&self, task_definition_arn: &str) -> bool {
    self.task_definition == task_definition_arn
      && self.running_count == self.desired_count
      && self.deployments == 1
  }
}
