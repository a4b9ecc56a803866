use anyhow::{Context, anyhow};
use gantry_client::entities::{
  service::ServiceSnapshot,
  task_definition::{RegisteredTaskDefinition, TaskDefinition},
};
use rollout::ControlPlane;
use serde::Deserialize;

/// Control plane implementation driving the `aws` CLI.
///
/// Task definition documents go in and out of the CLI as raw
/// JSON, so fields this tool does not model still round-trip
/// verbatim through describe -> migrate -> register.
pub struct AwsCli {
  region: Option<String>,
}

impl AwsCli {
  pub fn new(region: Option<String>) -> AwsCli {
    AwsCli { region }
  }

  async fn ecs(&self, args: &str) -> anyhow::Result<String> {
    let mut command = format!("aws ecs {args} --output json");
    if let Some(region) = &self.region {
      command.push_str(" --region ");
      command.push_str(region);
    }
    debug!("{command}");
    let output = ::command::run_command(&command, None).await;
    if output.success() {
      Ok(output.stdout)
    } else {
      Err(anyhow!("{}", output.stderr.trim())).with_context(
        || format!("aws command failed | {command}"),
      )
    }
  }
}

impl ControlPlane for AwsCli {
  async fn describe_service(
    &self,
    cluster: &str,
    service: &str,
  ) -> anyhow::Result<ServiceSnapshot> {
    let stdout = self
      .ecs(&format!(
        "describe-services --cluster {cluster} --services {service}"
      ))
      .await?;
    let mut described: DescribeServices =
      serde_json::from_str(&stdout)
        .context("failed to parse describe-services response")?;
    if described.services.is_empty() {
      return Err(anyhow!(
        "service {service} not found in cluster {cluster}"
      ));
    }
    let entry = described.services.remove(0);
    Ok(ServiceSnapshot {
      task_definition: entry.task_definition,
      desired_count: entry.desired_count,
      running_count: entry.running_count,
      deployments: entry.deployments.len(),
    })
  }

  async fn describe_task_definition(
    &self,
    task_definition: &str,
  ) -> anyhow::Result<TaskDefinition> {
    let stdout = self
      .ecs(&format!(
        "describe-task-definition --task-definition {task_definition}"
      ))
      .await?;
    let envelope: TaskDefinitionEnvelope =
      serde_json::from_str(&stdout).context(
        "failed to parse describe-task-definition response",
      )?;
    Ok(envelope.task_definition)
  }

  async fn register_task_definition(
    &self,
    definition: &TaskDefinition,
  ) -> anyhow::Result<RegisteredTaskDefinition> {
    // The document is passed through a file, `--cli-input-json`
    // style, to keep it off the command line.
    let path = std::env::temp_dir().join(format!(
      "gantry-task-definition-{}.json",
      std::process::id()
    ));
    let json = serde_json::to_string(definition)
      .context("failed to serialize task definition")?;
    tokio::fs::write(&path, json).await.with_context(|| {
      format!(
        "failed to write task definition to {}",
        path.display()
      )
    })?;

    let result = self
      .ecs(&format!(
        "register-task-definition --cli-input-json file://{}",
        path.display()
      ))
      .await;
    tokio::fs::remove_file(&path).await.ok();

    let envelope: RegisteredEnvelope =
      serde_json::from_str(&result?).context(
        "failed to parse register-task-definition response",
      )?;
    Ok(envelope.task_definition)
  }

  async fn update_service(
    &self,
    cluster: &str,
    service: &str,
    task_definition_arn: &str,
  ) -> anyhow::Result<()> {
    self
      .ecs(&format!(
        "update-service --cluster {cluster} --service {service} --task-definition {task_definition_arn}"
      ))
      .await?;
    Ok(())
  }
}

#[derive(Deserialize)]
struct DescribeServices {
  #[serde(default)]
  services: Vec<DescribedService>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribedService {
  task_definition: String,
  desired_count: i64,
  running_count: i64,
  #[serde(default)]
  deployments: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDefinitionEnvelope {
  task_definition: TaskDefinition,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredEnvelope {
  task_definition: RegisteredTaskDefinition,
}
