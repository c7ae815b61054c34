//! ssm-shell: interactive remote shell in an ephemeral ECS task.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ssm_shell::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .init();

    let code = Cli::parse().run().await;
    // A pending stdin read would otherwise hold up runtime shutdown.
    std::process::exit(i32::from(code));
}
