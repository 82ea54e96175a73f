//! Model Context Protocol (MCP) server for finmetrics-rs
//!
//! Serves a [`fin_tools::ToolRegistry`] to MCP clients over newline-delimited
//! JSON-RPC 2.0 on stdio. Supported methods are `initialize`, `ping`,
//! `tools/list` and `tools/call`; notifications are accepted and ignored.
//!
//! # Example
//!
//! ```no_run
//! use fin_mcp::McpServer;
//! use fin_tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ToolRegistry::new());
//! let server = McpServer::new(registry, "finmetrics", "0.1.0");
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod server;

pub use error::McpError;
pub use protocol::{JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, ServerInfo};
pub use server::McpServer;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;
