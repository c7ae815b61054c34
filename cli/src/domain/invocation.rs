//! Remote command invocation results.

/// Statuses that mean the command has not finished yet.
const PENDING_STATUSES: [&str; 3] = ["Pending", "InProgress", "Delayed"];

/// One lookup of a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Provider status detail, e.g. `"InProgress"` or `"Success"`.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandInvocation {
    /// A still-running invocation with no output yet.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: "Pending".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        PENDING_STATUSES.contains(&self.status.as_str())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command_id: String,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}
