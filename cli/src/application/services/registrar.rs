//! Wait for the launched task to register as a managed instance.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::cancel::{cancellable, pause};
use crate::application::ports::{ManagedInstance, ManagedInstanceRegistry, ProgressReporter};
use crate::domain::{SessionError, SessionIdentity, SessionTimings};

/// Result of filtering the instance list by display name.
#[derive(Debug, PartialEq, Eq)]
pub enum NameMatch<'a> {
    None,
    One(&'a str),
    Many(usize),
}

/// Find the instances whose display name equals `name`.
#[must_use]
pub fn match_by_name<'a>(instances: &'a [ManagedInstance], name: &str) -> NameMatch<'a> {
    let mut matches = instances
        .iter()
        .filter(|i| i.name.as_deref() == Some(name))
        .map(|i| i.instance_id.as_str());
    match (matches.next(), matches.count()) {
        (None, _) => NameMatch::None,
        (Some(id), 0) => NameMatch::One(id),
        (Some(_), rest) => NameMatch::Many(rest + 1),
    }
}

/// Polls the registry until this session's instance appears.
pub struct InstanceRegistrar<'a, M, R> {
    registry: &'a M,
    reporter: &'a R,
    timings: &'a SessionTimings,
}

impl<'a, M: ManagedInstanceRegistry, R: ProgressReporter> InstanceRegistrar<'a, M, R> {
    #[must_use]
    pub fn new(registry: &'a M, reporter: &'a R, timings: &'a SessionTimings) -> Self {
        Self {
            registry,
            reporter,
            timings,
        }
    }

    /// Poll every `registration_poll` until exactly one instance is named
    /// `identity`, bounded by `registration_timeout` of wall-clock time.
    ///
    /// # Errors
    ///
    /// - [`SessionError::RegistrationTimeout`] once the bound elapses.
    /// - [`SessionError::AmbiguousRegistration`] if more than one instance matches.
    /// - [`SessionError::Cancelled`] if interrupted while waiting.
    /// - Any registry failure.
    pub async fn await_registration(
        &self,
        identity: &SessionIdentity,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        let timeout = self.timings.registration_timeout;
        let started = Instant::now();
        self.reporter.step(&format!(
            "Waiting up to {}s for instance {identity} to become available...",
            timeout.as_secs()
        ));

        let mut polls = 0u32;
        loop {
            if started.elapsed() >= timeout {
                return Err(SessionError::RegistrationTimeout { waited: timeout });
            }
            pause(cancel, self.timings.registration_poll).await?;
            polls += 1;

            let instances = cancellable(cancel, self.registry.list_managed_instances())
                .await?
                .map_err(SessionError::from_cloud)?;
            match match_by_name(&instances, identity.as_str()) {
                NameMatch::None => {
                    tracing::debug!(polls, known = instances.len(), "instance not registered yet");
                }
                NameMatch::One(instance_id) => {
                    tracing::debug!(polls, %instance_id, "instance registered");
                    self.reporter
                        .success(&format!("instance {instance_id} registered"));
                    return Ok(instance_id.to_string());
                }
                NameMatch::Many(count) => {
                    return Err(SessionError::AmbiguousRegistration {
                        name: identity.to_string(),
                        count,
                    });
                }
            }
        }
    }
}
