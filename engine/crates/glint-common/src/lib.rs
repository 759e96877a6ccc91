//! Glint Common - Shared utilities: logging, configuration, content digests
//!
//! This crate provides common functionality used across all Glint crates.

pub mod config;
pub mod digest;
pub mod logging;

pub use config::{Config, ConfigBuilder};
pub use logging::{init_logging_with_config, LogConfig, LogFormat};
