//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the ECS and SSM adapters,
//! provider configuration, environment loading, stdin, and signal handling.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::output` are forbidden.

pub mod aws;
pub mod cloud_error;
pub mod config;
pub mod ecs;
pub mod input;
pub mod interrupt;
pub mod ssm;
