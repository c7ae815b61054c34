//! Managed-instance and remote-command adapter backed by the SSM API.

use anyhow::Result;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;

use crate::application::ports::{
    ActivationRequest, ManagedInstance, ManagedInstanceRegistry, RemoteCommandService,
};
use crate::domain::{Activation, CommandInvocation};
use crate::infra::cloud_error::cloud_error;

/// Document that runs its `commands` parameter as a shell script.
const SHELL_DOCUMENT: &str = "AWS-RunShellScript";

/// SSM implementation of both [`ManagedInstanceRegistry`] and
/// [`RemoteCommandService`].
pub struct SsmManagement {
    client: Client,
}

impl SsmManagement {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

impl ManagedInstanceRegistry for SsmManagement {
    async fn create_activation(&self, request: &ActivationRequest<'_>) -> Result<Activation> {
        let output = self
            .client
            .create_activation()
            .iam_role(request.iam_role)
            .default_instance_name(request.default_instance_name)
            .registration_limit(request.registration_limit)
            .send()
            .await
            .map_err(|e| cloud_error(e, "create activation"))?;
        match (output.activation_id(), output.activation_code()) {
            (Some(id), Some(code)) => Ok(Activation {
                id: id.to_owned(),
                code: code.to_owned(),
            }),
            _ => anyhow::bail!("activation response carried no id or code"),
        }
    }

    async fn delete_activation(&self, activation_id: &str) -> Result<()> {
        self.client
            .delete_activation()
            .activation_id(activation_id)
            .send()
            .await
            .map_err(|e| cloud_error(e, "delete activation"))?;
        Ok(())
    }

    async fn list_managed_instances(&self) -> Result<Vec<ManagedInstance>> {
        let mut stream = self
            .client
            .describe_instance_information()
            .into_paginator()
            .items()
            .send();
        let mut instances = Vec::new();
        while let Some(item) = stream.next().await {
            let info = item.map_err(|e| cloud_error(e, "describe instance information"))?;
            if let Some(instance_id) = info.instance_id() {
                instances.push(ManagedInstance {
                    instance_id: instance_id.to_owned(),
                    name: info.name().map(str::to_owned),
                });
            }
        }
        Ok(instances)
    }

    async fn deregister_managed_instance(&self, instance_id: &str) -> Result<()> {
        self.client
            .deregister_managed_instance()
            .instance_id(instance_id)
            .send()
            .await
            .map_err(|e| cloud_error(e, "deregister managed instance"))?;
        Ok(())
    }
}

impl RemoteCommandService for SsmManagement {
    async fn send_command(&self, instance_id: &str, command: &str) -> Result<Option<String>> {
        let output = self
            .client
            .send_command()
            .instance_ids(instance_id)
            .document_name(SHELL_DOCUMENT)
            .parameters("commands", vec![command.to_owned()])
            .send()
            .await
            .map_err(|e| cloud_error(e, "send command"))?;
        Ok(output
            .command()
            .and_then(|c| c.command_id())
            .map(str::to_owned))
    }

    async fn get_command_invocation(
        &self,
        command_id: &str,
        instance_id: &str,
    ) -> Result<CommandInvocation> {
        let output = self
            .client
            .get_command_invocation()
            .command_id(command_id)
            .instance_id(instance_id)
            .send()
            .await
            .map_err(|e| cloud_error(e, "get command invocation"))?;
        let pending = CommandInvocation::pending();
        Ok(CommandInvocation {
            status: output
                .status_details()
                .map_or(pending.status, str::to_owned),
            stdout: output
                .standard_output_content()
                .unwrap_or_default()
                .to_owned(),
            stderr: output
                .standard_error_content()
                .unwrap_or_default()
                .to_owned(),
        })
    }
}
