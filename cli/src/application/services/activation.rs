//! Single-use registration credentials.

use crate::application::ports::{ActivationRequest, ManagedInstanceRegistry};
use crate::domain::{Activation, SessionConfig, SessionError, SessionIdentity};

/// An activation may register exactly one instance.
pub const REGISTRATION_LIMIT: i32 = 1;

/// Issues the activation the launched task uses to self-register.
pub struct ActivationIssuer<'a, M> {
    registry: &'a M,
}

impl<'a, M: ManagedInstanceRegistry> ActivationIssuer<'a, M> {
    #[must_use]
    pub fn new(registry: &'a M) -> Self {
        Self { registry }
    }

    /// Request an activation named after the session. Not retried and not
    /// cancellable: once issued it must be recorded so teardown can delete it.
    ///
    /// # Errors
    ///
    /// Any failure is fatal; permission failures map to
    /// [`SessionError::PermissionDenied`].
    pub async fn issue(
        &self,
        config: &SessionConfig,
        identity: &SessionIdentity,
    ) -> Result<Activation, SessionError> {
        let request = ActivationRequest {
            iam_role: &config.iam_role,
            default_instance_name: identity.as_str(),
            registration_limit: REGISTRATION_LIMIT,
        };
        let activation = self
            .registry
            .create_activation(&request)
            .await
            .map_err(SessionError::from_cloud)?;
        tracing::debug!(activation_id = %activation.id, name = %identity, "activation issued");
        Ok(activation)
    }
}
