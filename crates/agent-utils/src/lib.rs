//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace:
//! logging setup and configuration loading.

pub mod config;
pub mod logging;

pub use config::{
    Config, ConfigError, MAX_BACKOFF_MULTIPLIER, MAX_RETRY_DELAY_SECS, RetrySettings,
};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
