//! Session configuration and the timing policy for every wait.

use std::time::Duration;

use crate::domain::error::SessionError;

/// Environment variables that must be present and non-empty at startup.
pub const REQUIRED_VARS: [&str; 3] = ["CLUSTER", "SERVICE", "IAM_ROLE"];

/// Validated startup parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Cluster that runs the target service.
    pub cluster: String,
    /// Service whose task definition and network placement are reused.
    pub service: String,
    /// IAM role handed to the activation for the registered instance.
    pub iam_role: String,
}

impl SessionConfig {
    /// Build a config from raw, possibly absent values.
    ///
    /// Every absent or blank value is reported at once, in [`REQUIRED_VARS`]
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingConfig`] if any value is absent or blank.
    pub fn from_parts(
        cluster: Option<String>,
        service: Option<String>,
        iam_role: Option<String>,
    ) -> Result<Self, SessionError> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let (cluster, service, iam_role) = (present(cluster), present(service), present(iam_role));

        if let (Some(cluster), Some(service), Some(iam_role)) = (&cluster, &service, &iam_role) {
            return Ok(Self {
                cluster: cluster.clone(),
                service: service.clone(),
                iam_role: iam_role.clone(),
            });
        }

        let missing = REQUIRED_VARS
            .iter()
            .zip([cluster.is_none(), service.is_none(), iam_role.is_none()])
            .filter_map(|(name, absent)| absent.then_some(*name))
            .collect::<Vec<_>>();
        Err(SessionError::MissingConfig {
            missing: missing.join(", "),
        })
    }
}

/// Poll intervals, attempt budgets and wall-clock bounds for every wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Total `run-task` attempts while the task definition is inactive.
    pub launch_attempts: u32,
    /// Back-off between launch attempts.
    pub launch_retry_delay: Duration,
    /// Budget for the platform's own "task running" waiter.
    pub task_running_timeout: Duration,
    /// Interval between managed-instance listings.
    pub registration_poll: Duration,
    /// Bound on the wait for the instance to register.
    pub registration_timeout: Duration,
    /// Interval between command-invocation lookups.
    pub command_poll: Duration,
    /// Bound on the wait for one command to finish.
    pub command_timeout: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            launch_attempts: 5,
            launch_retry_delay: Duration::from_secs(10),
            task_running_timeout: Duration::from_secs(600),
            registration_poll: Duration::from_secs(10),
            registration_timeout: Duration::from_secs(120),
            command_poll: Duration::from_secs(1),
            command_timeout: Duration::from_secs(60),
        }
    }
}
