//! Operator interrupt handling.
//!
//! The first interrupt cancels the session token; the driver observes it at
//! its next wait and tears down. Interrupts that arrive once teardown has
//! started are acknowledged and otherwise ignored.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::services::TeardownGuard;

/// Spawn the Ctrl-C watcher. `notify` receives operator-facing messages for
/// interrupts that cannot be acted on.
pub fn spawn_interrupt_watcher(
    cancel: CancellationToken,
    guard: TeardownGuard,
    notify: impl Fn(&str) + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "cannot listen for interrupts");
                return;
            }
            if guard.is_claimed() {
                notify("Cleanup in progress, please wait...");
            } else if cancel.is_cancelled() {
                notify("Interrupt already received, stopping...");
            } else {
                tracing::debug!("interrupt received");
                cancel.cancel();
            }
        }
    })
}
