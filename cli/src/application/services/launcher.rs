//! Ephemeral task launch with retry on an inactive task definition.
//!
//! Launch and readiness are separate calls so the driver can record the task
//! handle before the (long, fallible) wait for the task to run.

use tokio_util::sync::CancellationToken;

use crate::application::cancel::{cancellable, pause};
use crate::application::ports::{ContainerPlatform, LaunchRequest, ProgressReporter};
use crate::domain::{Activation, CloudError, ServicePlacement, SessionError, SessionTimings};

/// Entrypoint override: the bootstrap script registers the container with
/// the remote-management service using `CODE` and `ID`.
pub const BOOTSTRAP_COMMAND: [&str; 2] = ["/bin/sh", "/opt/ssm-shell.sh"];

/// Default "started by" label on launched tasks.
pub const STARTED_BY: &str = "ssm-shell";

/// Launches one task from the resolved placement.
pub struct TaskLauncher<'a, P, R> {
    platform: &'a P,
    reporter: &'a R,
    timings: &'a SessionTimings,
}

impl<'a, P: ContainerPlatform, R: ProgressReporter> TaskLauncher<'a, P, R> {
    #[must_use]
    pub fn new(platform: &'a P, reporter: &'a R, timings: &'a SessionTimings) -> Self {
        Self {
            platform,
            reporter,
            timings,
        }
    }

    /// Launch one task, retrying while the task definition is inactive.
    ///
    /// Each launch call runs to completion even if an interrupt arrives, so an
    /// accepted task is always returned to the caller to record.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LaunchRetriesExhausted`] once every attempt saw an
    ///   inactive task definition.
    /// - [`SessionError::TaskNotStarted`] if the platform returned no task.
    /// - [`SessionError::Cancelled`] if interrupted during the back-off.
    /// - Any other platform failure, without retry.
    pub async fn launch(
        &self,
        cluster: &str,
        placement: &ServicePlacement,
        activation: &Activation,
        started_by: &str,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        let environment = [
            ("CODE", activation.code.as_str()),
            ("ID", activation.id.as_str()),
        ];
        let request = LaunchRequest {
            cluster,
            task_definition: &placement.task_definition,
            container_name: &placement.container_name,
            command: &BOOTSTRAP_COMMAND,
            environment: &environment,
            started_by,
            security_groups: &placement.security_groups,
            subnets: &placement.subnets,
        };

        let attempts = self.timings.launch_attempts;
        for attempt in 1..=attempts {
            match self.platform.run_task(&request).await {
                Ok(Some(task_arn)) => {
                    tracing::debug!(%task_arn, attempt, "task launched");
                    return Ok(task_arn);
                }
                Ok(None) => return Err(SessionError::TaskNotStarted),
                Err(err)
                    if matches!(
                        CloudError::find(&err),
                        Some(CloudError::TaskDefinitionInactive(_))
                    ) =>
                {
                    tracing::debug!(attempt, error = %err, "task definition inactive");
                    if attempt < attempts {
                        self.reporter.warn(&format!(
                            "task definition is inactive (deploying?), retrying in {}s...",
                            self.timings.launch_retry_delay.as_secs()
                        ));
                        pause(cancel, self.timings.launch_retry_delay).await?;
                    }
                }
                Err(err) => return Err(SessionError::from_cloud(err)),
            }
        }
        Err(SessionError::LaunchRetriesExhausted { attempts })
    }

    /// Block until the platform reports the task running.
    ///
    /// # Errors
    ///
    /// - [`SessionError::TaskFailedToStart`] if the readiness check fails.
    /// - [`SessionError::Cancelled`] if interrupted while waiting.
    pub async fn await_running(
        &self,
        cluster: &str,
        task_arn: &str,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        self.reporter
            .step("Waiting for task to start. Please don't flame.");
        cancellable(
            cancel,
            self.platform
                .wait_until_running(cluster, task_arn, self.timings.task_running_timeout),
        )
        .await?
        .map_err(SessionError::TaskFailedToStart)?;
        self.reporter.success("task running");
        Ok(())
    }
}
