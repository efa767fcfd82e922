//! Configuration management module
//!
//! Provides TOML-based daemon configuration.

mod config;

pub use config::*;
