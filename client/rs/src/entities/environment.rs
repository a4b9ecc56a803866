use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Environment used when the requested one has no entry in the
/// environments file. A lookup miss is not an error.
pub const FALLBACK_ENVIRONMENT: &str = "dev";

/// Per-environment sizing and naming, keyed by environment name
/// in the environments file.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize,
)]
pub struct EnvironmentConfig {
  /// Task CPU units.
  pub cpu: u32,
  /// Task memory (MiB).
  pub memory: u32,
  /// Steady-state task count for the service.
  pub desired_count: u32,
  /// Logical container name inside the task definition.
  pub container_name: String,
  pub cluster_name: String,
  pub service_name: String,
  /// Source branch that triggers this environment's pipeline.
  pub branch: String,
  /// Value handed to the application as APP_ENV.
  pub app_env: String,
  /// Whether the environment also accepts HTTPS (443) ingress
  /// at the load balancer.
  #[serde(default)]
  pub https_ingress: bool,
}

/// The full environment name -> [EnvironmentConfig] mapping.
/// Insertion order is preserved for listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environments(pub IndexMap<String, EnvironmentConfig>);

impl Environments {
  /// Resolve an environment by name, falling back to the
  /// [FALLBACK_ENVIRONMENT] entry on a miss. Only a missing
  /// fallback entry is an error.
  pub fn resolve(
    &self,
    name: &str,
  ) -> anyhow::Result<&EnvironmentConfig> {
    if let Some(config) = self.0.get(name) {
      return Ok(config);
    }
    tracing::warn!(
      "environment '{name}' is not configured, falling back to '{FALLBACK_ENVIRONMENT}'"
    );
    self.0.get(FALLBACK_ENVIRONMENT).with_context(|| {
      format!(
        "environment '{name}' is not configured, and no '{FALLBACK_ENVIRONMENT}' fallback entry exists"
      )
    })
  }

  pub fn read(path: &Path) -> anyhow::Result<Environments> {
    let contents =
      std::fs::read_to_string(path).with_context(|| {
        format!(
          "failed to read environments file at {}",
          path.display()
        )
      })?;
    serde_json::from_str(&contents).with_context(|| {
      format!(
        "failed to parse environments file at {}",
        path.display()
      )
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn environments() -> Environments {
    serde_json::from_str(
      r#"{
        "dev": {
          "cpu": 256, "memory": 512, "desired_count": 1,
          "container_name": "app",
          "cluster_name": "app-cluster-dev",
          "service_name": "app-service-dev",
          "branch": "develop", "app_env": "development"
        },
        "prod": {
          "cpu": 1024, "memory": 2048, "desired_count": 3,
          "container_name": "app",
          "cluster_name": "app-cluster-prod",
          "service_name": "app-service-prod",
          "branch": "main", "app_env": "production",
          "https_ingress": true
        }
      }"#,
    )
    .unwrap()
  }

  #[test]
  fn exact_match_resolves() {
    let environments = environments();
    let prod = environments.resolve("prod").unwrap();
    assert_eq!(prod.cluster_name, "app-cluster-prod");
    assert!(prod.https_ingress);
  }

  #[test]
  fn lookup_miss_falls_back_to_dev() {
    let environments = environments();
    let resolved = environments.resolve("staging").unwrap();
    assert_eq!(resolved.cluster_name, "app-cluster-dev");
    assert!(!resolved.https_ingress);
  }

  #[test]
  fn missing_fallback_entry_is_an_error() {
    let environments = Environments(IndexMap::new());
    assert!(environments.resolve("staging").is_err());
  }
}
