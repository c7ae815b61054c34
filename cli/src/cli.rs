//! CLI entry point with clap derive

use chrono::Utc;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use crate::application::services::{Collaborators, SessionDriver, TeardownGuard};
use crate::domain::{SessionIdentity, SessionTimings};
use crate::infra::aws::load_sdk_config;
use crate::infra::config::load_session_config;
use crate::infra::ecs::EcsPlatform;
use crate::infra::input::StdinLines;
use crate::infra::interrupt::spawn_interrupt_watcher;
use crate::infra::ssm::SsmManagement;
use crate::output::{OutputContext, TerminalReporter};

/// Interactive shell in a throwaway copy of an ECS service's task.
///
/// Reads CLUSTER, SERVICE and IAM_ROLE from the environment, launches a
/// one-off task from the service's task definition, and runs each line you
/// type on it through SSM. Type `exit` to stop the task and clean up.
#[derive(Parser)]
#[command(name = "ssm-shell", version)]
pub struct Cli {}

impl Cli {
    /// Run one session and return the process exit status.
    pub async fn run(self) -> u8 {
        let ctx = OutputContext::new(false);

        let config = match load_session_config() {
            Ok(config) => config,
            Err(err) => {
                ctx.error(&err.to_string());
                return err.exit_code();
            }
        };
        let identity = SessionIdentity::new(&config, Utc::now());
        tracing::info!(%identity, cluster = %config.cluster, service = %config.service, "session starting");
        ctx.header(&format!(
            "Starting session {identity} for {}/{}",
            config.cluster, config.service
        ));

        let sdk_config = load_sdk_config().await;
        let ecs = EcsPlatform::new(&sdk_config);
        let ssm = SsmManagement::new(&sdk_config);
        let cloud = Collaborators {
            platform: &ecs,
            registry: &ssm,
            commands: &ssm,
        };

        let cancel = CancellationToken::new();
        let guard = TeardownGuard::new();
        let notify_ctx = OutputContext::new(false);
        let watcher = spawn_interrupt_watcher(cancel.clone(), guard.clone(), move |msg| {
            notify_ctx.warn(msg);
        });

        let timings = SessionTimings::default();
        let reporter = TerminalReporter::new(&ctx);
        let outcome = SessionDriver::new(
            &config, identity, &cloud, &reporter, &timings, cancel, guard,
        )
        .run(&mut StdinLines::new())
        .await;
        drop(reporter);
        watcher.abort();

        if outcome.error.is_none() {
            ctx.success(&outcome.reason.stop_reason());
        }
        if !outcome.cleanup.all_succeeded() {
            ctx.error("Some resources could not be released; see the warnings above.");
        }
        outcome.exit_code()
    }
}
