//! Shared test helpers for session service tests.
//!
//! Provides a silent reporter and macros that generate port stub methods
//! which bail with "not expected".

use crate::application::ports::ProgressReporter;

/// Reporter that swallows everything.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn detail(&self, _: &str, _: &str) {}
}

/// Generate `ContainerPlatform` stub methods that bail with "not expected".
///
/// Usage: `impl_platform_stubs!(describe_service, run_task);`
/// Omit any method you implement yourself.
macro_rules! impl_platform_stubs {
    ($($method:ident),* $(,)?) => {
        $(impl_platform_stubs!(@one $method);)*
    };
    (@one describe_service) => {
        async fn describe_service(
            &self,
            _: &str,
            _: &str,
        ) -> anyhow::Result<Option<$crate::application::ports::ServiceDescription>> {
            anyhow::bail!("not expected")
        }
    };
    (@one describe_task_definition) => {
        async fn describe_task_definition(&self, _: &str) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("not expected")
        }
    };
    (@one run_task) => {
        async fn run_task(
            &self,
            _: &$crate::application::ports::LaunchRequest<'_>,
        ) -> anyhow::Result<Option<String>> {
            anyhow::bail!("not expected")
        }
    };
    (@one wait_until_running) => {
        async fn wait_until_running(
            &self,
            _: &str,
            _: &str,
            _: std::time::Duration,
        ) -> anyhow::Result<()> {
            anyhow::bail!("not expected")
        }
    };
    (@one stop_task) => {
        async fn stop_task(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
            anyhow::bail!("not expected")
        }
    };
}

/// Generate `ManagedInstanceRegistry` stub methods that bail with "not expected".
macro_rules! impl_registry_stubs {
    ($($method:ident),* $(,)?) => {
        $(impl_registry_stubs!(@one $method);)*
    };
    (@one create_activation) => {
        async fn create_activation(
            &self,
            _: &$crate::application::ports::ActivationRequest<'_>,
        ) -> anyhow::Result<$crate::domain::Activation> {
            anyhow::bail!("not expected")
        }
    };
    (@one delete_activation) => {
        async fn delete_activation(&self, _: &str) -> anyhow::Result<()> {
            anyhow::bail!("not expected")
        }
    };
    (@one list_managed_instances) => {
        async fn list_managed_instances(
            &self,
        ) -> anyhow::Result<Vec<$crate::application::ports::ManagedInstance>> {
            anyhow::bail!("not expected")
        }
    };
    (@one deregister_managed_instance) => {
        async fn deregister_managed_instance(&self, _: &str) -> anyhow::Result<()> {
            anyhow::bail!("not expected")
        }
    };
}

pub(crate) use impl_platform_stubs;
pub(crate) use impl_registry_stubs;
