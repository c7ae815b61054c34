//! Session configuration from the process environment.

use serde::Deserialize;

use crate::domain::{SessionConfig, SessionError};

/// Raw variables as read by `envy`. Every field is optional here so that all
/// missing variables are reported together by [`SessionConfig::from_parts`].
#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    cluster: Option<String>,
    service: Option<String>,
    iam_role: Option<String>,
}

/// Load `CLUSTER`, `SERVICE` and `IAM_ROLE` from the environment.
///
/// # Errors
///
/// Returns [`SessionError::MissingConfig`] naming every unset or blank
/// variable.
pub fn load_session_config() -> Result<SessionConfig, SessionError> {
    from_vars(
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
    )
}

/// Build the configuration from an explicit variable set.
///
/// # Errors
///
/// See [`load_session_config`].
pub fn from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<SessionConfig, SessionError> {
    let raw: RawEnv = envy::from_iter(vars)
        .map_err(|e| SessionError::Backend(anyhow::Error::new(e).context("reading environment")))?;
    tracing::debug!(?raw, "environment read");
    SessionConfig::from_parts(raw.cluster, raw.service, raw.iam_role)
}
