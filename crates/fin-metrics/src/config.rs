//! Configuration for metric tools and market data access

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};

/// Default window for technical indicators
pub const DEFAULT_WINDOW: usize = 14;

/// Default bar interval for historical queries
pub const DEFAULT_INTERVAL: &str = "1d";

const DEFAULT_SEC_USER_AGENT: &str = "finmetrics (finmetrics@example.com)";

/// Configuration for the metric and market data tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Window used when a tool call omits `window`
    pub default_window: usize,

    /// Interval used when a history request omits `interval`
    pub default_interval: String,

    /// Whether the market data tools are registered alongside the metric tools
    pub enable_market_data: bool,

    /// User-Agent sent to SEC EDGAR (company name and contact email)
    pub sec_user_agent: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            default_window: DEFAULT_WINDOW,
            default_interval: DEFAULT_INTERVAL.to_string(),
            enable_market_data: true,
            sec_user_agent: DEFAULT_SEC_USER_AGENT.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create a new configuration builder
    pub fn builder() -> MetricsConfigBuilder {
        MetricsConfigBuilder::default()
    }

    /// Load overrides from the environment
    ///
    /// Reads `SEC_USER_AGENT` and `FINMETRICS_MARKET_DATA` (`0`/`false`
    /// disables the market data tools).
    pub fn from_env() -> Result<Self> {
        MetricsConfigBuilder::default().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_window == 0 {
            return Err(MetricsError::Config(
                "default_window must be greater than 0".to_string(),
            ));
        }

        if self.default_interval.trim().is_empty() {
            return Err(MetricsError::Config(
                "default_interval must not be empty".to_string(),
            ));
        }

        if self.enable_market_data && self.sec_user_agent.trim().is_empty() {
            return Err(MetricsError::Config(
                "sec_user_agent required when market data is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for MetricsConfig
#[derive(Debug, Default)]
pub struct MetricsConfigBuilder {
    default_window: Option<usize>,
    default_interval: Option<String>,
    enable_market_data: Option<bool>,
    sec_user_agent: Option<String>,
}

impl MetricsConfigBuilder {
    /// Set the default indicator window
    pub fn default_window(mut self, window: usize) -> Self {
        self.default_window = Some(window);
        self
    }

    /// Set the default history interval
    pub fn default_interval(mut self, interval: impl Into<String>) -> Self {
        self.default_interval = Some(interval.into());
        self
    }

    /// Enable or disable the market data tools
    pub fn enable_market_data(mut self, enabled: bool) -> Self {
        self.enable_market_data = Some(enabled);
        self
    }

    /// Set the SEC EDGAR User-Agent
    pub fn sec_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.sec_user_agent = Some(user_agent.into());
        self
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(agent) = std::env::var("SEC_USER_AGENT") {
            self.sec_user_agent = Some(agent);
        }
        if let Ok(flag) = std::env::var("FINMETRICS_MARKET_DATA") {
            self.enable_market_data = Some(parse_flag(&flag));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MetricsConfig> {
        let defaults = MetricsConfig::default();

        let config = MetricsConfig {
            default_window: self.default_window.unwrap_or(defaults.default_window),
            default_interval: self.default_interval.unwrap_or(defaults.default_interval),
            enable_market_data: self
                .enable_market_data
                .unwrap_or(defaults.enable_market_data),
            sec_user_agent: self.sec_user_agent.unwrap_or(defaults.sec_user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
