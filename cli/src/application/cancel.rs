//! Cancellation-aware waiting.
//!
//! Every blocking wait in a session goes through these helpers so an operator
//! interrupt surfaces as `SessionError::Cancelled` at the wait site instead of
//! mutating state from a signal handler.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::SessionError;

/// Sleep for `duration` unless cancelled first.
///
/// # Errors
///
/// Returns [`SessionError::Cancelled`] if the token fires before the sleep ends.
pub async fn pause(cancel: &CancellationToken, duration: Duration) -> Result<(), SessionError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SessionError::Cancelled),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Drive `fut` to completion unless cancelled first. An already-cancelled
/// token wins without polling `fut`.
///
/// # Errors
///
/// Returns [`SessionError::Cancelled`] if the token fires first.
pub async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Result<T, SessionError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SessionError::Cancelled),
        value = fut => Ok(value),
    }
}

/// Fail fast if an interrupt already arrived.
///
/// # Errors
///
/// Returns [`SessionError::Cancelled`] if the token has fired.
pub fn ensure_live(cancel: &CancellationToken) -> Result<(), SessionError> {
    if cancel.is_cancelled() {
        Err(SessionError::Cancelled)
    } else {
        Ok(())
    }
}
