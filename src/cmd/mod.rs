//! CLI surface: `chaosd` runs as a server by default, or drives a single
//! chaos command one-shot.

use clap::{Args, Parser, Subcommand};

pub mod oneshot;
pub mod root;

#[derive(Parser)]
#[command(name = "chaosd")]
#[command(about = "Chaos engineering daemon: fault injection for containers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Docker socket/address to connect to (defaults to the platform's
    /// standard Docker Engine endpoint).
    #[arg(long, global = true, env = "DOCKER_SOCKET")]
    pub docker_socket: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the chaos HTTP daemon.
    Server {
        /// Path to the daemon's TOML configuration file.
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Send a signal to matching containers.
    Kill(KillArgs),
    /// Pause matching containers, then unpause them.
    Pause(PauseArgs),
    /// Stop matching containers, optionally restarting them.
    Stop(StopArgs),
    /// Remove matching containers.
    Rm(RemoveArgs),
    /// Apply a netem network emulation to matching containers.
    Netem {
        #[command(subcommand)]
        variant: NetemCommands,
    },
}

/// Target-selection flags every one-shot command shares.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Container names to act on. Ignored if `--pattern` is set.
    #[arg(short, long)]
    pub names: Vec<String>,

    /// RE2-style regex (optionally prefixed `re2:`) matching container names.
    #[arg(short, long, default_value = "")]
    pub pattern: String,

    /// Cap the number of matched containers. 0 means unlimited.
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Pick a single random container from the matched set.
    #[arg(long)]
    pub random: bool,

    /// Recurrence interval (`"10s"`, ...). Empty means one-shot.
    #[arg(short, long, default_value = "")]
    pub interval: String,

    /// Report what would happen without acting on any container.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct KillArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Signal to send (e.g. `SIGKILL`, `SIGTERM`). Defaults to `SIGKILL`.
    #[arg(short, long, default_value = "")]
    pub signal: String,
}

#[derive(Args, Debug)]
pub struct PauseArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// How long to hold the pause before unpausing.
    #[arg(short = 'd', long, default_value = "")]
    pub duration: String,
}

#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// How long to stay stopped before restarting (requires `--restart`).
    #[arg(short = 'd', long, default_value = "")]
    pub duration: String,

    /// Seconds to wait for graceful stop before the runtime force-kills.
    #[arg(short = 'w', long, default_value_t = chaosd::chaos::commands::stop::DEFAULT_WAIT_SECONDS)]
    pub wait_seconds: i64,

    /// Start the containers back up after `duration` elapses.
    #[arg(long)]
    pub restart: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Force removal of a running container.
    #[arg(short, long)]
    pub force: bool,

    /// Remove linked containers.
    #[arg(long)]
    pub links: bool,

    /// Remove anonymous volumes associated with the container.
    #[arg(short = 'v', long)]
    pub volumes: bool,
}

#[derive(Subcommand)]
pub enum NetemCommands {
    Delay(DelayArgs),
    Loss(LossArgs),
    LossGemodel(LossGemodelArgs),
    Rate(RateArgs),
    Corrupt(CorruptArgs),
    Duplicate(DuplicateArgs),
}

/// Fields shared by every netem variant beyond target selection.
#[derive(Args, Debug)]
pub struct NetemArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Network interface inside the target container (e.g. `eth0`).
    #[arg(short = 'I', long, default_value = "eth0")]
    pub iface: String,

    /// How long to apply the discipline before tearing it down.
    #[arg(short = 'd', long)]
    pub duration: String,

    /// Restrict the discipline to these destination CIDRs.
    #[arg(long)]
    pub ips: Vec<String>,

    /// Restrict the discipline to this destination port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Sidecar image to use instead of the daemon's configured default.
    #[arg(long)]
    pub image: Option<String>,

    /// Pull the sidecar image before use.
    #[arg(long)]
    pub pull: bool,
}

#[derive(Args, Debug)]
pub struct DelayArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(short = 't', long)]
    pub time_ms: u64,
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jitter_ms: u64,
    #[arg(short = 'c', long, default_value_t = 0.0)]
    pub correlation: f64,
    #[arg(long)]
    pub distribution: Option<String>,
}

#[derive(Args, Debug)]
pub struct LossArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(short = 'p', long)]
    pub percentage: f64,
    #[arg(short = 'c', long, default_value_t = 0.0)]
    pub correlation: f64,
}

#[derive(Args, Debug)]
pub struct LossGemodelArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(long)]
    pub pg: f64,
    #[arg(long, default_value_t = 0.0)]
    pub pb: f64,
    #[arg(long = "one-h", default_value_t = 0.0)]
    pub one_h: f64,
    #[arg(long = "one-k", default_value_t = 0.0)]
    pub one_k: f64,
}

#[derive(Args, Debug)]
pub struct RateArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(short = 'r', long)]
    pub rate: String,
    #[arg(long)]
    pub packet_overhead: Option<i64>,
    #[arg(long)]
    pub cell_size: Option<i64>,
    #[arg(long)]
    pub cell_overhead: Option<i64>,
}

#[derive(Args, Debug)]
pub struct CorruptArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(short = 'p', long)]
    pub percentage: f64,
    #[arg(short = 'c', long, default_value_t = 0.0)]
    pub correlation: f64,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    #[command(flatten)]
    pub netem: NetemArgs,
    #[arg(short = 'p', long)]
    pub percentage: f64,
    #[arg(short = 'c', long, default_value_t = 0.0)]
    pub correlation: f64,
}
