//! chaosd: chaos engineering daemon for containers.

use clap::Parser;
use tracing::error;

mod cmd;

use cmd::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chaosd={log_level}").into()),
        )
        .init();

    let exit_code = match cli.command {
        Commands::Server { config } => match cmd::root::run(&config, cli.docker_socket).await {
            Ok(()) => 0,
            Err(e) => {
                error!(error = %e, "daemon exited with an error");
                1
            }
        },
        other => cmd::oneshot::run(other, cli.docker_socket).await,
    };

    std::process::exit(exit_code);
}
