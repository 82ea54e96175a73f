//! Error types for the MCP server

use thiserror::Error;

/// Errors that can stop the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// Reading from or writing to the transport failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: McpError = std::io::Error::other("pipe closed").into();
        assert!(err.to_string().starts_with("IO error"));

        let err: McpError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
