//! Application services — session use-case orchestration.
//!
//! Each service module covers one stage of a session by composing domain
//! logic with port trait calls. Services import only from `crate::domain` and
//! `crate::application` — never from `crate::infra` or `crate::output`.

pub mod activation;
pub mod cleanup;
pub mod driver;
pub mod executor;
pub mod launcher;
pub mod registrar;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use cleanup::{CleanupReport, TeardownGuard};
pub use driver::{Collaborators, SessionDriver, SessionOutcome};
