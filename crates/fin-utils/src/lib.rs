//! Shared utilities for finmetrics-rs
//!
//! Logging setup and application-level configuration used by the server
//! and CLI binaries.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
