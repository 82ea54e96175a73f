//! Tool registration and dispatch for finmetrics-rs
//!
//! Calculation and data functions are wrapped as [`Tool`]s and stored by
//! their external name in a [`ToolRegistry`]. The registry only names and
//! forwards; all logic lives in the tools themselves.

pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

pub use error::{Error, Result};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDefinition};
