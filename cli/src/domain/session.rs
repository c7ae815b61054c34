//! Session identity, acquired-resource record, and operator input.
//!
//! `SessionState` is filled monotonically as provisioning succeeds. Each
//! optional field is both the record of an acquisition and the trigger for the
//! matching teardown step; teardown takes the field out so it runs once.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::config::SessionConfig;
use crate::domain::error::SessionError;

/// Upper bound the container platform accepts for a stop reason.
const MAX_STOP_REASON_CHARS: usize = 255;

// ── Identity ──────────────────────────────────────────────────────────────────

/// `<cluster>-<service>-<unix seconds>`: default name of the activation and the
/// key used to find the registered instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    #[must_use]
    pub fn new(config: &SessionConfig, started_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}",
            config.cluster,
            config.service,
            started_at.timestamp()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Acquired values ───────────────────────────────────────────────────────────

/// Task template and network placement discovered from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePlacement {
    pub task_definition: String,
    /// First container defined in the task definition.
    pub container_name: String,
    pub security_groups: BTreeSet<String>,
    pub subnets: BTreeSet<String>,
}

/// Single-use registration credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Activation {
    pub id: String,
    pub code: String,
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("id", &self.id)
            .field("code", &"<redacted>")
            .finish()
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Session lifecycle. Each arrow is one component succeeding; any failure
/// jumps straight to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SessionPhase {
    #[default]
    Init,
    Resolved,
    Activated,
    Launched,
    Registered,
    Interactive,
    Terminated,
}

impl SessionPhase {
    /// The phase reached when the next component succeeds.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Resolved),
            Self::Resolved => Some(Self::Activated),
            Self::Activated => Some(Self::Launched),
            Self::Launched => Some(Self::Registered),
            Self::Registered => Some(Self::Interactive),
            Self::Interactive => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }

    #[must_use]
    pub fn can_advance_to(self, to: Self) -> bool {
        (to == Self::Terminated && self != Self::Terminated) || self.next() == Some(to)
    }
}

/// Everything acquired so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    phase: SessionPhase,
    placement: Option<ServicePlacement>,
    activation: Option<Activation>,
    task_arn: Option<String>,
    instance_id: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Move to `to`; only the next phase or `Terminated` is legal.
    pub fn advance(&mut self, to: SessionPhase) {
        debug_assert!(
            self.phase.can_advance_to(to),
            "illegal session transition {:?} -> {to:?}",
            self.phase
        );
        self.phase = to;
    }

    pub fn record_placement(&mut self, placement: ServicePlacement) {
        self.placement = Some(placement);
    }

    pub fn record_activation(&mut self, activation: Activation) {
        self.activation = Some(activation);
    }

    pub fn record_task(&mut self, task_arn: impl Into<String>) {
        self.task_arn = Some(task_arn.into());
    }

    pub fn record_instance(&mut self, instance_id: impl Into<String>) {
        self.instance_id = Some(instance_id.into());
    }

    #[must_use]
    pub fn placement(&self) -> Option<&ServicePlacement> {
        self.placement.as_ref()
    }

    #[must_use]
    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    #[must_use]
    pub fn task_arn(&self) -> Option<&str> {
        self.task_arn.as_deref()
    }

    #[must_use]
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    pub fn take_task_arn(&mut self) -> Option<String> {
        self.task_arn.take()
    }

    pub fn take_activation(&mut self) -> Option<Activation> {
        self.activation.take()
    }

    pub fn take_instance_id(&mut self) -> Option<String> {
        self.instance_id.take()
    }
}

// ── Ending ────────────────────────────────────────────────────────────────────

/// Why the session ended. Rendered into the task stop reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// Operator typed `exit`.
    Exited,
    /// Operator input stream closed.
    InputClosed,
    /// Operator interrupt.
    Interrupted,
    /// Fatal error, with its user-facing message.
    Failed(String),
}

impl EndReason {
    #[must_use]
    pub fn from_error(err: &SessionError) -> Self {
        match err {
            SessionError::Cancelled => Self::Interrupted,
            other => Self::Failed(other.to_string()),
        }
    }

    /// Human-readable reason, truncated to what the platform accepts.
    #[must_use]
    pub fn stop_reason(&self) -> String {
        let reason = match self {
            Self::Exited => "Exited".to_string(),
            Self::InputClosed => "Input closed".to_string(),
            Self::Interrupted => "Interrupted by user".to_string(),
            Self::Failed(message) => message.clone(),
        };
        reason.chars().take(MAX_STOP_REASON_CHARS).collect()
    }
}

// ── Operator input ────────────────────────────────────────────────────────────

/// Sentinel that ends the session instead of running remotely.
pub const EXIT_SENTINEL: &str = "exit";

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    Exit,
    Blank,
    Command(String),
}

impl OperatorInput {
    /// Classify a raw line. Only the line terminator is stripped before the
    /// sentinel comparison.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == EXIT_SENTINEL {
            Self::Exit
        } else if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Command(line.to_string())
        }
    }
}
