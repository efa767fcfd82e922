//! One-shot CLI execution: resolve targets, build the requested command,
//! and drive it to completion in this process (no HTTP, no job registry).
//!
//! A Ctrl+C cancels the run the same way the HTTP cancel endpoint would,
//! via `run_token`, while `teardown_token` stays alive so in-flight
//! teardown (unpause, restart, qdisc removal) always finishes.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::error;

use chaosd::chaos::client::docker::DockerRuntimeClient;
use chaosd::chaos::client::RuntimeClient;
use chaosd::chaos::command::ChaosCommand;
use chaosd::chaos::commands::netem::{Corrupt, Delay, Duplicate, Loss, LossGemodel, Rate};
use chaosd::chaos::commands::{Kill, Pause, Remove, Stop};
use chaosd::chaos::error::ChaosError;
use chaosd::chaos::filter::{apply_random_pick, list_targets, Filter};
use chaosd::chaos::interval::{parse_duration, parse_interval};
use chaosd::chaos::runner::Runner;

use super::{Commands, NetemArgs, NetemCommands, TargetArgs};

/// Connect to Docker and execute `command` one-shot. Returns the process
/// exit code per the error taxonomy: 0 on success, 2 for a bad
/// request the user can fix, 1 for a runtime action/teardown failure.
pub async fn run(command: Commands, docker_socket: Option<String>) -> i32 {
    let client: Arc<dyn RuntimeClient> = match connect(docker_socket) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!(error = %e, "failed to connect to Docker");
            return 1;
        }
    };

    match build(command, client.as_ref()).await {
        Ok((chaos_command, interval)) => drive(chaos_command, client, interval).await,
        Err(e) => {
            error!(error = %e, "chaos command rejected");
            exit_code(&e)
        }
    }
}

fn connect(docker_socket: Option<String>) -> Result<DockerRuntimeClient> {
    match docker_socket {
        Some(socket) => DockerRuntimeClient::connect_socket(&socket),
        None => DockerRuntimeClient::connect_local(),
    }
}

async fn build(
    command: Commands,
    client: &dyn RuntimeClient,
) -> Result<(Arc<dyn ChaosCommand>, std::time::Duration), ChaosError> {
    match command {
        Commands::Server { .. } => unreachable!("server mode is dispatched before reaching one-shot execution"),
        Commands::Kill(args) => {
            let (targets, interval) = resolve(client, &args.targets).await?;
            let cmd = Kill::new(targets, args.signal, args.targets.dry_run)?;
            Ok((Arc::new(cmd), interval))
        }
        Commands::Pause(args) => {
            let (targets, interval) = resolve(client, &args.targets).await?;
            let duration = parse_duration(&args.duration, interval)?;
            Ok((Arc::new(Pause::new(targets, duration, args.targets.dry_run)), interval))
        }
        Commands::Stop(args) => {
            let (targets, interval) = resolve(client, &args.targets).await?;
            let duration = parse_duration(&args.duration, interval)?;
            let cmd = Stop::new(targets, duration, args.wait_seconds, args.restart, args.targets.dry_run);
            Ok((Arc::new(cmd), interval))
        }
        Commands::Rm(args) => {
            let (targets, interval) = resolve(client, &args.targets).await?;
            let cmd = Remove::new(targets, args.force, args.links, args.volumes, args.targets.dry_run);
            Ok((Arc::new(cmd), interval))
        }
        Commands::Netem { variant } => build_netem(variant, client).await,
    }
}

async fn resolve(
    client: &dyn RuntimeClient,
    targets: &TargetArgs,
) -> Result<(Vec<chaosd::chaos::container::Container>, std::time::Duration), ChaosError> {
    let filter = Filter::new(targets.names.clone(), targets.pattern.clone(), targets.limit);
    let resolved = list_targets(client, &filter).await?;
    let resolved = apply_random_pick(resolved, targets.random);
    let interval = parse_interval(&targets.interval)?;
    Ok((resolved, interval))
}

async fn netem_prep(
    client: &dyn RuntimeClient,
    netem: &NetemArgs,
) -> Result<
    (
        Vec<chaosd::chaos::container::Container>,
        std::time::Duration,
        std::time::Duration,
        Vec<ipnet::IpNet>,
    ),
    ChaosError,
> {
    let (targets, interval) = resolve(client, &netem.targets).await?;
    let duration = parse_duration(&netem.duration, interval)?;
    let ips = chaosd::chaos::commands::netem::parse_cidrs(&netem.ips)?;
    Ok((targets, interval, duration, ips))
}

async fn build_netem(
    variant: NetemCommands,
    client: &dyn RuntimeClient,
) -> Result<(Arc<dyn ChaosCommand>, std::time::Duration), ChaosError> {
    match variant {
        NetemCommands::Delay(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = Delay::build(
                targets, args.netem.iface, args.time_ms, args.jitter_ms, args.correlation, args.distribution,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
        NetemCommands::Loss(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = Loss::build(
                targets, args.netem.iface, args.percentage, args.correlation,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
        NetemCommands::LossGemodel(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = LossGemodel::build(
                targets, args.netem.iface, args.pg, args.pb, args.one_h, args.one_k,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
        NetemCommands::Rate(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = Rate::build(
                targets, args.netem.iface, args.rate, args.packet_overhead, args.cell_size, args.cell_overhead,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
        NetemCommands::Corrupt(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = Corrupt::build(
                targets, args.netem.iface, args.percentage, args.correlation,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
        NetemCommands::Duplicate(args) => {
            let (targets, interval, duration, ips) = netem_prep(client, &args.netem).await?;
            let image = args.netem.image.unwrap_or_else(|| chaosd::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string());
            let cmd = Duplicate::build(
                targets, args.netem.iface, args.percentage, args.correlation,
                ips, args.netem.port, duration, image, args.netem.pull, args.netem.targets.dry_run,
            )?;
            Ok((Arc::new(cmd), interval))
        }
    }
}

async fn drive(command: Arc<dyn ChaosCommand>, client: Arc<dyn RuntimeClient>, interval: std::time::Duration) -> i32 {
    let run_token = CancellationToken::new();
    let teardown_token = CancellationToken::new();

    let ctrl_c_token = run_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    match Runner::run_to_completion(command, client, interval, run_token, teardown_token).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "chaos command failed");
            exit_code(&e)
        }
    }
}

fn exit_code(e: &ChaosError) -> i32 {
    match e {
        ChaosError::InvalidParameter(_) | ChaosError::BadRequest(_) => 2,
        _ => 1,
    }
}
