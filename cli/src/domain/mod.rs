//! Domain layer — pure session types, validation, and error taxonomy.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `crate::output`, `tokio`, or any cloud SDK. All functions are synchronous
//! and take data in, returning data out.

pub mod config;
pub mod error;
pub mod invocation;
pub mod session;

pub use config::{SessionConfig, SessionTimings};
pub use error::{CloudError, SessionError};
pub use invocation::{CommandInvocation, CommandOutput};
pub use session::{
    Activation, EndReason, OperatorInput, ServicePlacement, SessionIdentity, SessionPhase,
    SessionState,
};
