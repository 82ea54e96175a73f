//! Error types for metric calculations and market data access

use thiserror::Error;

/// Metrics and data access errors
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Input is malformed, too short, or names an unknown indicator
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required field is absent from the financial data
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The formula is undefined for the given input (e.g. division by zero)
    #[error("Domain error: {0}")]
    Domain(String),

    /// The market data provider failed or returned unusable data
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for metrics operations
pub type Result<T> = std::result::Result<T, MetricsError>;

impl From<MetricsError> for fin_tools::Error {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::InvalidArgument(_) | MetricsError::MissingField(_) => {
                fin_tools::Error::InvalidParameters(err.to_string())
            }
            _ => fin_tools::Error::ProcessingFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetricsError::MissingField("revenue".to_string());
        assert_eq!(err.to_string(), "Missing required field: revenue");

        let err = MetricsError::Domain("division by zero".to_string());
        assert_eq!(err.to_string(), "Domain error: division by zero");
    }

    #[test]
    fn test_error_conversion() {
        let tool_err: fin_tools::Error = MetricsError::MissingField("cogs".to_string()).into();
        assert!(matches!(tool_err, fin_tools::Error::InvalidParameters(ref msg) if msg.contains("cogs")));

        let tool_err: fin_tools::Error = MetricsError::Domain("zero".to_string()).into();
        match tool_err {
            fin_tools::Error::ProcessingFailed(msg) => assert!(msg.contains("Domain error")),
            _ => panic!("Expected ProcessingFailed variant"),
        }
    }
}
