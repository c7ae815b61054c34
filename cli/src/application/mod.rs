//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`
//! or `crate::output`.

pub mod cancel;
pub mod ports;
pub mod services;

pub use ports::{
    ActivationRequest, ContainerPlatform, LaunchRequest, LineSource, ManagedInstance,
    ManagedInstanceRegistry, ProgressReporter, RemoteCommandService, ServiceDescription,
};
