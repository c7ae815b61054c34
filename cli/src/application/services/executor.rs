//! Remote shell command submission and completion polling.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::cancel::{cancellable, pause};
use crate::application::ports::{ProgressReporter, RemoteCommandService};
use crate::domain::{CloudError, CommandOutput, SessionError, SessionTimings};

/// Runs one operator command against the registered instance.
pub struct CommandExecutor<'a, C, R> {
    commands: &'a C,
    reporter: &'a R,
    timings: &'a SessionTimings,
}

impl<'a, C: RemoteCommandService, R: ProgressReporter> CommandExecutor<'a, C, R> {
    #[must_use]
    pub fn new(commands: &'a C, reporter: &'a R, timings: &'a SessionTimings) -> Self {
        Self {
            commands,
            reporter,
            timings,
        }
    }

    /// Submit `command` as a single-step shell script and wait for it to
    /// finish. Stdout and stderr are reported to the operator and returned
    /// verbatim.
    ///
    /// An invocation the service has not indexed yet counts as pending.
    ///
    /// # Errors
    ///
    /// - [`SessionError::CommandNotStarted`] if submission yields no handle.
    /// - [`SessionError::CommandTimeout`] once `command_timeout` elapses.
    /// - [`SessionError::Cancelled`] if interrupted while waiting.
    /// - Any other service failure.
    pub async fn execute(
        &self,
        instance_id: &str,
        command: &str,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput, SessionError> {
        let command_id = cancellable(cancel, self.commands.send_command(instance_id, command))
            .await?
            .map_err(SessionError::from_cloud)?
            .ok_or(SessionError::CommandNotStarted)?;
        tracing::debug!(%command_id, %instance_id, "command submitted");

        let timeout = self.timings.command_timeout;
        let started = Instant::now();
        self.reporter.step("running...");
        let invocation = loop {
            pause(cancel, self.timings.command_poll).await?;
            if started.elapsed() >= timeout {
                return Err(SessionError::CommandTimeout {
                    command_id,
                    waited: timeout,
                });
            }
            let lookup = cancellable(
                cancel,
                self.commands.get_command_invocation(&command_id, instance_id),
            )
            .await?;
            match lookup {
                Ok(invocation) if !invocation.is_pending() => break invocation,
                Ok(invocation) => {
                    tracing::debug!(%command_id, status = %invocation.status, "command pending");
                }
                Err(err)
                    if matches!(
                        CloudError::find(&err),
                        Some(CloudError::InvocationNotFound(_))
                    ) =>
                {
                    tracing::debug!(%command_id, "invocation not indexed yet");
                }
                Err(err) => return Err(SessionError::from_cloud(err)),
            }
        };

        self.reporter
            .success(&format!("command finished: {}", invocation.status));
        self.reporter.detail("Result", &invocation.stdout);
        self.reporter.detail("Errors", &invocation.stderr);
        Ok(CommandOutput {
            command_id,
            status: invocation.status,
            stdout: invocation.stdout,
            stderr: invocation.stderr,
        })
    }
}
