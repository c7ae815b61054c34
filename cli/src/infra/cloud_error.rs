//! Classification of provider SDK failures into [`CloudError`].
//!
//! Adapters wrap every SDK error with [`cloud_error`] so services can branch
//! on `CloudError` without seeing SDK types.

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::domain::CloudError;

/// Error code of a command invocation the service has not indexed yet.
const INVOCATION_NOT_FOUND: &str = "InvocationDoesNotExist";

/// Message fragment of a launch against a deregistered task definition.
const TASK_DEFINITION_INACTIVE: &str = "TaskDefinition is inactive";

/// Classify a provider failure from its error code and message.
#[must_use]
pub fn classify(code: Option<&str>, message: Option<&str>, detail: String) -> CloudError {
    let message = message.unwrap_or_default();
    match code {
        Some(code) if code.contains("AccessDenied") => CloudError::AccessDenied(detail),
        Some(INVOCATION_NOT_FOUND) => CloudError::InvocationNotFound(detail),
        _ if message.contains(TASK_DEFINITION_INACTIVE) => CloudError::TaskDefinitionInactive(detail),
        _ => CloudError::Service(detail),
    }
}

/// Wrap an SDK failure as a classified `anyhow::Error`, tagged with `action`.
pub fn cloud_error<E, R>(err: SdkError<E, R>, action: &str) -> anyhow::Error
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let code = err.code().map(str::to_owned);
    let message = err.message().map(str::to_owned);
    let detail = DisplayErrorContext(&err).to_string();
    tracing::debug!(action, code = ?code, %detail, "cloud call failed");
    anyhow::Error::new(classify(code.as_deref(), message.as_deref(), detail)).context(action.to_owned())
}
