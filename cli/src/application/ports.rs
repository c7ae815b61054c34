//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::output`.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Activation, CommandInvocation};

// ── Value Types ───────────────────────────────────────────────────────────────

/// What the platform reports about a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescription {
    /// Active task definition, if the service has one.
    pub task_definition: Option<String>,
    pub security_groups: Vec<String>,
    pub subnets: Vec<String>,
}

/// Launch parameters for one ephemeral task.
#[derive(Debug)]
pub struct LaunchRequest<'a> {
    pub cluster: &'a str,
    pub task_definition: &'a str,
    /// Container whose command and environment are overridden.
    pub container_name: &'a str,
    pub command: &'a [&'a str],
    pub environment: &'a [(&'a str, &'a str)],
    pub started_by: &'a str,
    pub security_groups: &'a BTreeSet<String>,
    pub subnets: &'a BTreeSet<String>,
}

/// Parameters for a single-use registration credential.
#[derive(Debug)]
pub struct ActivationRequest<'a> {
    pub iam_role: &'a str,
    pub default_instance_name: &'a str,
    pub registration_limit: i32,
}

/// An instance known to the remote-management service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedInstance {
    pub instance_id: String,
    /// Display name; the activation's default instance name once registered.
    pub name: Option<String>,
}

// ── Cloud Port Traits ─────────────────────────────────────────────────────────

/// Container orchestration: service discovery and task lifecycle.
#[allow(async_fn_in_trait)]
pub trait ContainerPlatform {
    /// Describe a service; `None` when the cluster has no such service.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<ServiceDescription>>;
    /// Container names of a task definition, in definition order.
    async fn describe_task_definition(&self, task_definition: &str) -> Result<Vec<String>>;
    /// Launch exactly one task. Returns its handle, or `None` if the platform
    /// accepted the call but started nothing.
    ///
    /// # Errors
    ///
    /// A momentarily inactive task definition is reported as
    /// `CloudError::TaskDefinitionInactive`.
    async fn run_task(&self, request: &LaunchRequest<'_>) -> Result<Option<String>>;
    /// Block until the platform's readiness check reports the task running.
    async fn wait_until_running(
        &self,
        cluster: &str,
        task_arn: &str,
        max_wait: Duration,
    ) -> Result<()>;
    /// Stop a task, recording why.
    async fn stop_task(&self, cluster: &str, task_arn: &str, reason: &str) -> Result<()>;
}

/// Activations and managed-instance registrations.
#[allow(async_fn_in_trait)]
pub trait ManagedInstanceRegistry {
    async fn create_activation(&self, request: &ActivationRequest<'_>) -> Result<Activation>;
    async fn delete_activation(&self, activation_id: &str) -> Result<()>;
    /// Every managed instance, across all pages.
    async fn list_managed_instances(&self) -> Result<Vec<ManagedInstance>>;
    async fn deregister_managed_instance(&self, instance_id: &str) -> Result<()>;
}

/// Remote shell command execution against a managed instance.
#[allow(async_fn_in_trait)]
pub trait RemoteCommandService {
    /// Submit one shell command. Returns the command handle, if one was issued.
    async fn send_command(&self, instance_id: &str, command: &str) -> Result<Option<String>>;
    /// Look up a submitted command.
    ///
    /// # Errors
    ///
    /// An invocation that is not indexed yet is reported as
    /// `CloudError::InvocationNotFound`.
    async fn get_command_invocation(
        &self,
        command_id: &str,
        instance_id: &str,
    ) -> Result<CommandInvocation>;
}

// ── Operator Ports ────────────────────────────────────────────────────────────

/// Line-oriented operator input.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Show `prompt` and read one line. `None` at end of input.
    async fn next_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a labelled block of captured text, verbatim.
    fn detail(&self, label: &str, body: &str);
}
