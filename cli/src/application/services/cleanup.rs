//! Ordered, presence-driven teardown of everything a session acquired.
//!
//! Order: stop task, delete activation, deregister instance. Each step runs
//! only when its handle is present in `SessionState` and takes the handle out,
//! so running teardown again finds nothing to do. Steps are best-effort: a
//! failure is reported and the next step still runs.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::{ContainerPlatform, ManagedInstanceRegistry, ProgressReporter};
use crate::domain::{EndReason, SessionPhase, SessionState};

// ── Guard ─────────────────────────────────────────────────────────────────────

/// Latched once teardown starts. Shared with the interrupt watcher so a
/// second interrupt is ignored instead of re-entering teardown.
#[derive(Debug, Clone, Default)]
pub struct TeardownGuard(Arc<AtomicBool>);

impl TeardownGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim teardown. `false` if it was already claimed.
    pub fn try_begin(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// One teardown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    StopTask,
    DeleteActivation,
    DeregisterInstance,
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StopTask => "stop task",
            Self::DeleteActivation => "delete activation",
            Self::DeregisterInstance => "deregister instance",
        })
    }
}

/// A step that ran, the handle it released, and its error if it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupAction {
    pub step: CleanupStep,
    pub handle: String,
    pub error: Option<String>,
}

/// What teardown did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// `true` when teardown had already been claimed and nothing ran.
    pub skipped: bool,
    pub actions: Vec<CleanupAction>,
}

impl CleanupReport {
    /// Steps that ran, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<CleanupStep> {
        self.actions.iter().map(|a| a.step).collect()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.actions.iter().all(|a| a.error.is_none())
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

/// Runs teardown exactly once per guard.
pub struct CleanupCoordinator<'a, P, M, R> {
    platform: &'a P,
    registry: &'a M,
    reporter: &'a R,
    guard: TeardownGuard,
}

impl<'a, P, M, R> CleanupCoordinator<'a, P, M, R>
where
    P: ContainerPlatform,
    M: ManagedInstanceRegistry,
    R: ProgressReporter,
{
    #[must_use]
    pub fn new(platform: &'a P, registry: &'a M, reporter: &'a R, guard: TeardownGuard) -> Self {
        Self {
            platform,
            registry,
            reporter,
            guard,
        }
    }

    /// Release whatever `state` holds, in fixed order, then mark it
    /// terminated. Never fails; per-step errors are reported and recorded.
    pub async fn run(
        &self,
        cluster: &str,
        state: &mut SessionState,
        reason: &EndReason,
    ) -> CleanupReport {
        if !self.guard.try_begin() {
            tracing::debug!("teardown already claimed, skipping");
            return CleanupReport {
                skipped: true,
                actions: Vec::new(),
            };
        }

        self.reporter.warn("Cleaning up, please do not interrupt this!");
        let mut report = CleanupReport::default();

        if let Some(task_arn) = state.take_task_arn() {
            self.reporter.step("Stopping ecs task...");
            let result = self
                .platform
                .stop_task(cluster, &task_arn, &reason.stop_reason())
                .await;
            report
                .actions
                .push(self.settle(CleanupStep::StopTask, task_arn, result, "Task stopped successfully."));
        }

        if let Some(activation) = state.take_activation() {
            self.reporter.step("Deleting ssm activation...");
            let result = self.registry.delete_activation(&activation.id).await;
            report.actions.push(self.settle(
                CleanupStep::DeleteActivation,
                activation.id,
                result,
                "Ssm activation deleted successfully.",
            ));
        }

        if let Some(instance_id) = state.take_instance_id() {
            self.reporter.step("Deregistering ssm instance...");
            let result = self.registry.deregister_managed_instance(&instance_id).await;
            report.actions.push(self.settle(
                CleanupStep::DeregisterInstance,
                instance_id,
                result,
                "Ssm instance deregistered successfully.",
            ));
        }

        if state.phase() != SessionPhase::Terminated {
            state.advance(SessionPhase::Terminated);
        }
        self.reporter.success("Cleanup complete.");
        report
    }

    fn settle(
        &self,
        step: CleanupStep,
        handle: String,
        result: anyhow::Result<()>,
        done: &str,
    ) -> CleanupAction {
        let error = match result {
            Ok(()) => {
                self.reporter.success(done);
                None
            }
            Err(err) => {
                tracing::warn!(%step, %handle, error = %format!("{err:#}"), "cleanup step failed");
                self.reporter.warn(&format!("failed to {step} {handle}: {err:#}"));
                Some(format!("{err:#}"))
            }
        };
        CleanupAction {
            step,
            handle,
            error,
        }
    }
}
