use std::time::Duration;

use gantry_client::entities::task_definition::{
  RegisteredTaskDefinition, TaskDefinition,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::ControlPlane;

/// The rollout state machine. Each deployment invocation is a
/// fresh instance; the terminal states are represented by
/// [DeploymentOutcome] and there is no transition back to
/// [RolloutState::Idle].
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  strum::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum RolloutState {
  #[default]
  Idle,
  Registering,
  Updating,
  WaitingForStable,
}

#[derive(Debug, Error)]
pub enum RolloutError {
  /// The control plane refused the registration or update call.
  /// Not retried here; retry policy belongs to the caller.
  #[error("control plane rejected the rollout while {state} | {error:#}")]
  Rejected {
    state: RolloutState,
    error: anyhow::Error,
  },

  /// The service did not reach steady state in the configured
  /// bound. The wait is abandoned, the in-flight service update
  /// is not rolled back.
  #[error("service did not stabilize within {}s", waited.as_secs())]
  Timeout { waited: Duration },
}

/// Terminal state of a rollout.
#[derive(Debug)]
pub enum DeploymentOutcome {
  /// The service reached its desired running count on the new
  /// definition.
  Stable(RegisteredTaskDefinition),
  Failed(RolloutError),
}

/// Register `new_definition`, point the service at the new
/// revision, and poll every `poll_interval` until the service is
/// stable on it or `timeout` elapses. Strictly sequential; the
/// poll is the only blocking wait. Never returns
/// [RolloutError::Timeout] before `timeout` has fully elapsed.
pub async fn deploy(
  control_plane: &impl ControlPlane,
  new_definition: &TaskDefinition,
  cluster: &str,
  service: &str,
  poll_interval: Duration,
  timeout: Duration,
) -> DeploymentOutcome {
  info!("registering new task definition revision");
  let registered = match control_plane
    .register_task_definition(new_definition)
    .await
  {
    Ok(registered) => registered,
    Err(e) => {
      return DeploymentOutcome::Failed(RolloutError::Rejected {
        state: RolloutState::Registering,
        error: e,
      });
    }
  };
  info!("registered {registered}");

  info!("updating service {service} in cluster {cluster}");
  if let Err(e) = control_plane
    .update_service(
      cluster,
      service,
      &registered.task_definition_arn,
    )
    .await
  {
    return DeploymentOutcome::Failed(RolloutError::Rejected {
      state: RolloutState::Updating,
      error: e,
    });
  }

  info!(
    "waiting up to {}s for {service} to stabilize",
    timeout.as_secs()
  );
  wait_for_stable(
    control_plane,
    registered,
    cluster,
    service,
    poll_interval,
    timeout,
  )
  .await
}

async fn wait_for_stable(
  control_plane: &impl ControlPlane,
  registered: RegisteredTaskDefinition,
  cluster: &str,
  service: &str,
  poll_interval: Duration,
  timeout: Duration,
) -> DeploymentOutcome {
  let start = tokio::time::Instant::now();
  loop {
    let waited = start.elapsed();
    if waited >= timeout {
      return DeploymentOutcome::Failed(RolloutError::Timeout {
        waited,
      });
    }

    // Clamp the last sleep so the final poll lands on the
    // deadline rather than past it.
    tokio::time::sleep(poll_interval.min(timeout - waited)).await;

    match control_plane.describe_service(cluster, service).await {
      Ok(snapshot)
        if snapshot
          .is_stable_on(&registered.task_definition_arn) =>
      {
        info!(
          "service {service} stable on {registered} after {}s",
          start.elapsed().as_secs()
        );
        return DeploymentOutcome::Stable(registered);
      }
      Ok(snapshot) => {
        info!(
          "service {service} not yet stable | running {}/{} across {} deployments",
          snapshot.running_count,
          snapshot.desired_count,
          snapshot.deployments,
        );
      }
      // Transient describe failures don't fail the rollout,
      // the next poll retries. Persistent failure surfaces as
      // a timeout.
      Err(e) => {
        warn!("failed to poll service {service} | {e:#}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use anyhow::anyhow;
  use gantry_client::entities::service::ServiceSnapshot;
  use tokio::time::Instant;

  use super::*;

  const NEW_ARN: &str =
    "arn:aws:ecs:us-east-1:123:task-definition/app:8";
  const OLD_ARN: &str =
    "arn:aws:ecs:us-east-1:123:task-definition/app:7";

  /// Control plane whose service transitions from `before` to
  /// `after` once `stable_after` has elapsed.
  struct FakeControlPlane {
    before: ServiceSnapshot,
    after: ServiceSnapshot,
    stable_after: Duration,
    started: Instant,
    polls: AtomicUsize,
    updated_to: Mutex<Option<String>>,
    describe_failures: AtomicUsize,
  }

  impl FakeControlPlane {
    fn stabilizing_at(stable_after: Duration) -> Self {
      FakeControlPlane {
        before: ServiceSnapshot {
          task_definition: OLD_ARN.into(),
          desired_count: 2,
          running_count: 1,
          deployments: 2,
        },
        after: ServiceSnapshot {
          task_definition: NEW_ARN.into(),
          desired_count: 2,
          running_count: 2,
          deployments: 1,
        },
        stable_after,
        started: Instant::now(),
        polls: AtomicUsize::new(0),
        updated_to: Mutex::new(None),
        describe_failures: AtomicUsize::new(0),
      }
    }
  }

  impl ControlPlane for FakeControlPlane {
    async fn describe_service(
      &self,
      _cluster: &str,
      _service: &str,
    ) -> anyhow::Result<ServiceSnapshot> {
      self.polls.fetch_add(1, Ordering::SeqCst);
      if self.describe_failures.load(Ordering::SeqCst) > 0 {
        self.describe_failures.fetch_sub(1, Ordering::SeqCst);
        return Err(anyhow!("throttled"));
      }
      if self.started.elapsed() >= self.stable_after {
        Ok(self.after.clone())
      } else {
        Ok(self.before.clone())
      }
    }

    async fn describe_task_definition(
      &self,
      _task_definition: &str,
    ) -> anyhow::Result<TaskDefinition> {
      Ok(TaskDefinition::default())
    }

    async fn register_task_definition(
      &self,
      _definition: &TaskDefinition,
    ) -> anyhow::Result<RegisteredTaskDefinition> {
      Ok(RegisteredTaskDefinition {
        task_definition_arn: NEW_ARN.into(),
        revision: 8,
      })
    }

    async fn update_service(
      &self,
      _cluster: &str,
      _service: &str,
      task_definition_arn: &str,
    ) -> anyhow::Result<()> {
      *self.updated_to.lock().unwrap() =
        Some(task_definition_arn.to_string());
      Ok(())
    }
  }

  /// Control plane that refuses registration or update.
  struct Rejecting {
    fail_register: bool,
  }

  impl ControlPlane for Rejecting {
    async fn describe_service(
      &self,
      _cluster: &str,
      _service: &str,
    ) -> anyhow::Result<ServiceSnapshot> {
      Ok(ServiceSnapshot::default())
    }

    async fn describe_task_definition(
      &self,
      _task_definition: &str,
    ) -> anyhow::Result<TaskDefinition> {
      Ok(TaskDefinition::default())
    }

    async fn register_task_definition(
      &self,
      _definition: &TaskDefinition,
    ) -> anyhow::Result<RegisteredTaskDefinition> {
      if self.fail_register {
        Err(anyhow!("missing iam permissions"))
      } else {
        Ok(RegisteredTaskDefinition {
          task_definition_arn: NEW_ARN.into(),
          revision: 8,
        })
      }
    }

    async fn update_service(
      &self,
      _cluster: &str,
      _service: &str,
      _task_definition_arn: &str,
    ) -> anyhow::Result<()> {
      Err(anyhow!("service not found"))
    }
  }

  #[tokio::test(start_paused = true)]
  async fn stabilizing_service_ends_stable() {
    // Service stabilizes at t=12s. Polls at 5s / 10s miss it,
    // the 15s poll sees it, well before the 30s bound.
    let control_plane = FakeControlPlane::stabilizing_at(
      Duration::from_secs(12),
    );
    let outcome = deploy(
      &control_plane,
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(30),
    )
    .await;

    let DeploymentOutcome::Stable(registered) = outcome else {
      panic!("expected stable outcome");
    };
    assert_eq!(registered.task_definition_arn, NEW_ARN);
    assert_eq!(
      control_plane.polls.load(Ordering::SeqCst),
      3
    );
    assert_eq!(
      control_plane.updated_to.lock().unwrap().as_deref(),
      Some(NEW_ARN)
    );
  }

  #[tokio::test(start_paused = true)]
  async fn wait_times_out_no_earlier_than_the_bound() {
    let control_plane = FakeControlPlane::stabilizing_at(
      Duration::from_secs(3600),
    );
    let start = Instant::now();
    let outcome = deploy(
      &control_plane,
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(10),
    )
    .await;

    let DeploymentOutcome::Failed(RolloutError::Timeout {
      waited,
    }) = outcome
    else {
      panic!("expected timeout");
    };
    assert!(waited >= Duration::from_secs(10));
    assert!(start.elapsed() >= Duration::from_secs(10));
    // Polled at 5s and at the 10s deadline.
    assert_eq!(control_plane.polls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn final_poll_lands_on_the_deadline() {
    // Stable at t=6s with a 7s bound: the clamped second sleep
    // polls at exactly 7s and still finds stability.
    let control_plane =
      FakeControlPlane::stabilizing_at(Duration::from_secs(6));
    let outcome = deploy(
      &control_plane,
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(7),
    )
    .await;
    assert!(matches!(outcome, DeploymentOutcome::Stable(_)));
  }

  #[tokio::test(start_paused = true)]
  async fn transient_describe_failures_are_retried() {
    let control_plane =
      FakeControlPlane::stabilizing_at(Duration::from_secs(1));
    control_plane
      .describe_failures
      .store(2, Ordering::SeqCst);
    let outcome = deploy(
      &control_plane,
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(60),
    )
    .await;
    assert!(matches!(outcome, DeploymentOutcome::Stable(_)));
    assert_eq!(control_plane.polls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn rejected_registration_fails_while_registering() {
    let outcome = deploy(
      &Rejecting {
        fail_register: true,
      },
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(10),
    )
    .await;
    assert!(matches!(
      outcome,
      DeploymentOutcome::Failed(RolloutError::Rejected {
        state: RolloutState::Registering,
        ..
      })
    ));
  }

  #[tokio::test]
  async fn rejected_update_fails_while_updating() {
    let outcome = deploy(
      &Rejecting {
        fail_register: false,
      },
      &TaskDefinition::default(),
      "cluster",
      "service",
      Duration::from_secs(5),
      Duration::from_secs(10),
    )
    .await;
    assert!(matches!(
      outcome,
      DeploymentOutcome::Failed(RolloutError::Rejected {
        state: RolloutState::Updating,
        ..
      })
    ));
  }
}
