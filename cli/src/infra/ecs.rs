//! Container platform adapter backed by the ECS API.

use std::time::Duration;

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::client::Waiters;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, LaunchType,
    NetworkConfiguration, TaskOverride,
};

use crate::application::ports::{ContainerPlatform, LaunchRequest, ServiceDescription};
use crate::infra::cloud_error::cloud_error;

/// ECS implementation of [`ContainerPlatform`]. Tasks launch on Fargate with
/// no public IP.
pub struct EcsPlatform {
    client: Client,
}

impl EcsPlatform {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

impl ContainerPlatform for EcsPlatform {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<ServiceDescription>> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|e| cloud_error(e, "describe service"))?;

        let Some(found) = output.services().first() else {
            for failure in output.failures() {
                tracing::debug!(arn = ?failure.arn(), reason = ?failure.reason(), "describe service failure");
            }
            return Ok(None);
        };
        let awsvpc = found
            .network_configuration()
            .and_then(NetworkConfiguration::awsvpc_configuration);
        Ok(Some(ServiceDescription {
            task_definition: found.task_definition().map(str::to_owned),
            security_groups: awsvpc
                .map(|c| c.security_groups().to_vec())
                .unwrap_or_default(),
            subnets: awsvpc.map(|c| c.subnets().to_vec()).unwrap_or_default(),
        }))
    }

    async fn describe_task_definition(&self, task_definition: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(|e| cloud_error(e, "describe task definition"))?;
        Ok(output
            .task_definition()
            .map(|td| {
                td.container_definitions()
                    .iter()
                    .filter_map(|c| c.name().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn run_task(&self, request: &LaunchRequest<'_>) -> Result<Option<String>> {
        let awsvpc = AwsVpcConfiguration::builder()
            .set_subnets(Some(request.subnets.iter().cloned().collect()))
            .set_security_groups(Some(request.security_groups.iter().cloned().collect()))
            .assign_public_ip(AssignPublicIp::Disabled)
            .build()
            .context("invalid task network configuration")?;
        let environment = request
            .environment
            .iter()
            .map(|(name, value)| KeyValuePair::builder().name(*name).value(*value).build())
            .collect();
        let container = ContainerOverride::builder()
            .name(request.container_name)
            .set_command(Some(
                request.command.iter().map(|arg| (*arg).to_owned()).collect(),
            ))
            .set_environment(Some(environment))
            .build();

        let output = self
            .client
            .run_task()
            .cluster(request.cluster)
            .task_definition(request.task_definition)
            .count(1)
            .launch_type(LaunchType::Fargate)
            .started_by(request.started_by)
            .network_configuration(
                NetworkConfiguration::builder()
                    .awsvpc_configuration(awsvpc)
                    .build(),
            )
            .overrides(TaskOverride::builder().container_overrides(container).build())
            .send()
            .await
            .map_err(|e| cloud_error(e, "run task"))?;

        for failure in output.failures() {
            tracing::warn!(arn = ?failure.arn(), reason = ?failure.reason(), "run task failure");
        }
        Ok(output
            .tasks()
            .first()
            .and_then(|task| task.task_arn())
            .map(str::to_owned))
    }

    async fn wait_until_running(
        &self,
        cluster: &str,
        task_arn: &str,
        max_wait: Duration,
    ) -> Result<()> {
        self.client
            .wait_until_tasks_running()
            .cluster(cluster)
            .tasks(task_arn)
            .wait(max_wait)
            .await
            .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(&e)))?;
        tracing::debug!(%task_arn, "task running");
        Ok(())
    }

    async fn stop_task(&self, cluster: &str, task_arn: &str, reason: &str) -> Result<()> {
        self.client
            .stop_task()
            .cluster(cluster)
            .task(task_arn)
            .reason(reason)
            .send()
            .await
            .map_err(|e| cloud_error(e, "stop task"))?;
        Ok(())
    }
}
