//! Application-level configuration

use serde::{Deserialize, Serialize};

/// Application configuration shared by the binaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application name, reported as the MCP server name
    pub app_name: String,
    /// Application version, reported as the MCP server version
    pub version: String,
    /// Environment (development, production, ...)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "finmetrics".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Build a config from defaults overridden by `FINMETRICS_APP_NAME`
    /// and `FINMETRICS_ENV`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("FINMETRICS_APP_NAME") {
            if !name.trim().is_empty() {
                config.app_name = name;
            }
        }
        if let Ok(env) = std::env::var("FINMETRICS_ENV") {
            if !env.trim().is_empty() {
                config.environment = env;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "finmetrics");
        assert_eq!(config.environment, "development");
        assert!(!config.version.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let value = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(value["app_name"], "finmetrics");
    }
}
