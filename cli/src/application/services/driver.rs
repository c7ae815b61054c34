//! Top-level session control: provision, run the command loop, tear down.
//!
//! `Init → Resolved → Activated → Launched → Registered → Interactive →
//! Terminated`. Every exit path, including errors and interrupts, goes
//! through [`CleanupCoordinator::run`] exactly once.

use tokio_util::sync::CancellationToken;

use crate::application::cancel::{cancellable, ensure_live};
use crate::application::ports::{
    ContainerPlatform, LineSource, ManagedInstanceRegistry, ProgressReporter, RemoteCommandService,
};
use crate::application::services::activation::ActivationIssuer;
use crate::application::services::cleanup::{CleanupCoordinator, CleanupReport, TeardownGuard};
use crate::application::services::executor::CommandExecutor;
use crate::application::services::launcher::{STARTED_BY, TaskLauncher};
use crate::application::services::registrar::InstanceRegistrar;
use crate::application::services::resolver::ServiceResolver;
use crate::domain::{
    EndReason, OperatorInput, SessionConfig, SessionError, SessionIdentity, SessionPhase,
    SessionState, SessionTimings,
};

/// Operator prompt.
pub const PROMPT: &str = "> ";

/// The cloud collaborators a session talks to.
pub struct Collaborators<'a, P, M, C> {
    pub platform: &'a P,
    pub registry: &'a M,
    pub commands: &'a C,
}

/// How a session ended.
#[derive(Debug)]
pub struct SessionOutcome {
    pub reason: EndReason,
    /// The fatal error, if the session did not end by operator choice.
    pub error: Option<SessionError>,
    pub cleanup: CleanupReport,
    /// Phase reached before teardown.
    pub reached: SessionPhase,
}

impl SessionOutcome {
    /// Process exit status: 0 for operator exit, otherwise by failure kind.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.error.as_ref().map_or(0, SessionError::exit_code)
    }
}

/// Owns the session state and sequences the components.
pub struct SessionDriver<'a, P, M, C, R> {
    config: &'a SessionConfig,
    identity: SessionIdentity,
    reporter: &'a R,
    resolver: ServiceResolver<'a, P>,
    issuer: ActivationIssuer<'a, M>,
    launcher: TaskLauncher<'a, P, R>,
    registrar: InstanceRegistrar<'a, M, R>,
    executor: CommandExecutor<'a, C, R>,
    cleanup: CleanupCoordinator<'a, P, M, R>,
    cancel: CancellationToken,
    state: SessionState,
}

impl<'a, P, M, C, R> SessionDriver<'a, P, M, C, R>
where
    P: ContainerPlatform,
    M: ManagedInstanceRegistry,
    C: RemoteCommandService,
    R: ProgressReporter,
{
    #[must_use]
    pub fn new(
        config: &'a SessionConfig,
        identity: SessionIdentity,
        cloud: &Collaborators<'a, P, M, C>,
        reporter: &'a R,
        timings: &'a SessionTimings,
        cancel: CancellationToken,
        guard: TeardownGuard,
    ) -> Self {
        Self {
            config,
            identity,
            reporter,
            resolver: ServiceResolver::new(cloud.platform),
            issuer: ActivationIssuer::new(cloud.registry),
            launcher: TaskLauncher::new(cloud.platform, reporter, timings),
            registrar: InstanceRegistrar::new(cloud.registry, reporter, timings),
            executor: CommandExecutor::new(cloud.commands, reporter, timings),
            cleanup: CleanupCoordinator::new(cloud.platform, cloud.registry, reporter, guard),
            cancel,
            state: SessionState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run the whole session and always tear down.
    pub async fn run(mut self, input: &mut impl LineSource) -> SessionOutcome {
        let result = match self.connect().await {
            Ok(()) => self.command_loop(input).await,
            Err(err) => Err(err),
        };
        let reached = self.state.phase();

        let (reason, error) = match result {
            Ok(reason) => (reason, None),
            Err(err) => {
                if !matches!(err, SessionError::Cancelled) {
                    tracing::debug!(error = %format!("{err:#}"), phase = ?reached, "session failed");
                }
                self.reporter.warn(&format!("{err:#}"));
                (EndReason::from_error(&err), Some(err))
            }
        };

        let cleanup = self
            .cleanup
            .run(&self.config.cluster, &mut self.state, &reason)
            .await;
        SessionOutcome {
            reason,
            error,
            cleanup,
            reached,
        }
    }

    /// Provision everything up to a registered instance. Each acquired handle
    /// is recorded before the next wait so teardown can release it.
    ///
    /// # Errors
    ///
    /// Returns the first fatal condition; the state keeps whatever was
    /// acquired before it.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        let placement = self.resolver.resolve(self.config, &self.cancel).await?;
        self.state.record_placement(placement.clone());
        self.state.advance(SessionPhase::Resolved);

        ensure_live(&self.cancel)?;
        let activation = self.issuer.issue(self.config, &self.identity).await?;
        self.state.record_activation(activation.clone());
        self.state.advance(SessionPhase::Activated);

        ensure_live(&self.cancel)?;
        let task_arn = self
            .launcher
            .launch(
                &self.config.cluster,
                &placement,
                &activation,
                STARTED_BY,
                &self.cancel,
            )
            .await?;
        self.state.record_task(task_arn.clone());
        self.launcher
            .await_running(&self.config.cluster, &task_arn, &self.cancel)
            .await?;
        self.state.advance(SessionPhase::Launched);

        let instance_id = self
            .registrar
            .await_registration(&self.identity, &self.cancel)
            .await?;
        self.state.record_instance(instance_id);
        self.state.advance(SessionPhase::Registered);
        Ok(())
    }

    /// Read, dispatch, repeat until `exit` or end of input.
    async fn command_loop(&mut self, input: &mut impl LineSource) -> Result<EndReason, SessionError> {
        let instance_id = self
            .state
            .instance_id()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("command loop started without a registered instance"))?;
        self.state.advance(SessionPhase::Interactive);
        self.reporter.success("Ready for commands.");

        loop {
            let line = cancellable(&self.cancel, input.next_line(PROMPT))
                .await?
                .map_err(SessionError::Backend)?;
            let Some(line) = line else {
                return Ok(EndReason::InputClosed);
            };
            match OperatorInput::parse(&line) {
                OperatorInput::Exit => return Ok(EndReason::Exited),
                OperatorInput::Blank => {}
                OperatorInput::Command(command) => {
                    self.executor
                        .execute(&instance_id, &command, &self.cancel)
                        .await?;
                }
            }
        }
    }
}
