//! Typed domain error enums.
//!
//! `CloudError` is what adapters attach to the `anyhow::Error` returned from a
//! port call; services classify with `downcast_ref`. `SessionError` is the
//! fatal-condition taxonomy every provisioning step funnels into.

use std::time::Duration;

use thiserror::Error;

// ── Cloud errors ──────────────────────────────────────────────────────────────

/// Provider failures that change control flow.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The task definition is momentarily inactive (a deployment is in flight).
    #[error("task definition is inactive: {0}")]
    TaskDefinitionInactive(String),

    /// The command invocation is not indexed yet.
    #[error("command invocation not found: {0}")]
    InvocationNotFound(String),

    #[error("{0}")]
    Service(String),
}

impl CloudError {
    /// Find a `CloudError` anywhere in an `anyhow` chain.
    #[must_use]
    pub fn find(err: &anyhow::Error) -> Option<&CloudError> {
        err.chain().find_map(|cause| cause.downcast_ref::<CloudError>())
    }
}

// ── Session errors ────────────────────────────────────────────────────────────

/// Fatal session conditions. Every variant routes through teardown.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing required environment variables: {missing}")]
    MissingConfig { missing: String },

    #[error("You do not have permission to perform this action!")]
    PermissionDenied(#[source] anyhow::Error),

    #[error("Task definition not found for service {service}")]
    TaskDefinitionNotFound { service: String },

    #[error("Task definition {task_definition} defines no containers")]
    ContainerNotFound { task_definition: String },

    #[error("Failed to retrieve task definition after {attempts} attempts (still inactive)")]
    LaunchRetriesExhausted { attempts: u32 },

    #[error("Failed to start task.")]
    TaskNotStarted,

    #[error("Task failed to start!")]
    TaskFailedToStart(#[source] anyhow::Error),

    #[error("Timeout waiting for ssm instance to register after {}s.", .waited.as_secs())]
    RegistrationTimeout { waited: Duration },

    #[error("Too many SSM instances named {name} ({count}); refusing to pick one")]
    AmbiguousRegistration { name: String, count: usize },

    #[error("Command failed to start.")]
    CommandNotStarted,

    #[error("Timeout waiting for command {command_id} to complete after {}s.", .waited.as_secs())]
    CommandTimeout { command_id: String, waited: Duration },

    #[error("Interrupted by user")]
    Cancelled,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl SessionError {
    /// Convert a port failure, lifting permission errors out of the backend bucket.
    #[must_use]
    pub fn from_cloud(err: anyhow::Error) -> Self {
        if matches!(CloudError::find(&err), Some(CloudError::AccessDenied(_))) {
            Self::PermissionDenied(err)
        } else {
            Self::Backend(err)
        }
    }

    /// Process exit status for a session that ended with this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingConfig { .. } => 2,
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}
