//! chaosd: chaos engineering daemon for containers.
//!
//! Injects and reverses container-level faults (kill, pause, stop, remove)
//! and network-level faults (netem: delay, loss, loss-gemodel, rate,
//! corrupt, duplicate) against a local Docker runtime, one-shot from the
//! CLI or as a recurring job driven through the HTTP control surface.

pub mod chaos;
pub mod config;
pub mod error;
pub mod router;

pub use config::Configuration;
