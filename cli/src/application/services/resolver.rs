//! Service discovery: task definition, first container, network placement.
//!
//! Imports only from `crate::domain` and `crate::application`.

use tokio_util::sync::CancellationToken;

use crate::application::cancel::cancellable;
use crate::application::ports::ContainerPlatform;
use crate::domain::{ServicePlacement, SessionConfig, SessionError};

/// Discovers what an ephemeral task needs from the running service.
pub struct ServiceResolver<'a, P> {
    platform: &'a P,
}

impl<'a, P: ContainerPlatform> ServiceResolver<'a, P> {
    #[must_use]
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    /// Resolve the service's active task definition and network placement.
    ///
    /// # Errors
    ///
    /// - [`SessionError::PermissionDenied`] if the caller lacks access.
    /// - [`SessionError::TaskDefinitionNotFound`] if the service has no task definition.
    /// - [`SessionError::ContainerNotFound`] if the task definition has no containers.
    /// - [`SessionError::Backend`] for any other platform failure.
    pub async fn resolve(
        &self,
        config: &SessionConfig,
        cancel: &CancellationToken,
    ) -> Result<ServicePlacement, SessionError> {
        tracing::debug!(cluster = %config.cluster, service = %config.service, "describing service");
        let description = cancellable(
            cancel,
            self.platform
                .describe_service(&config.cluster, &config.service),
        )
        .await?
        .map_err(SessionError::from_cloud)?
        .unwrap_or_default();

        let Some(task_definition) = description.task_definition else {
            return Err(SessionError::TaskDefinitionNotFound {
                service: config.service.clone(),
            });
        };

        let containers = cancellable(
            cancel,
            self.platform.describe_task_definition(&task_definition),
        )
        .await?
        .map_err(SessionError::from_cloud)?;
        let Some(container_name) = containers.into_iter().next() else {
            return Err(SessionError::ContainerNotFound { task_definition });
        };

        tracing::debug!(%task_definition, %container_name, "service resolved");
        Ok(ServicePlacement {
            task_definition,
            container_name,
            security_groups: description.security_groups.into_iter().collect(),
            subnets: description.subnets.into_iter().collect(),
        })
    }
}
