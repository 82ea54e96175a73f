//! Error types for tool dispatch

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// Parameters did not match the tool's input schema
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// No tool is registered under the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The tool ran but could not produce a result
    #[error("Tool processing failed: {0}")]
    ProcessingFailed(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidParameters(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ToolNotFound("missing_tool".to_string());
        assert_eq!(err.to_string(), "Tool not found: missing_tool");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<f64>>("not json").unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }
}
