//! Shared provider configuration.

use aws_config::{BehaviorVersion, SdkConfig};

/// Load region and credentials from the ambient default chain
/// (environment, shared profile, instance or container role).
pub async fn load_sdk_config() -> SdkConfig {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    tracing::debug!(region = ?config.region(), "provider configuration loaded");
    config
}
