//! Tool registration for the metrics engine and data access layer
//!
//! Every tool deserializes its parameters, forwards them to one engine
//! function or data wrapper, and returns the result unchanged.

pub mod market_data;
pub mod metrics;

pub use market_data::{MarketDataKind, MarketDataTool};
pub use metrics::{FinancialMetricsTool, GrowthRatesTool, TechnicalIndicatorsTool};

use fin_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

use crate::api::YahooProvider;
use crate::config::MetricsConfig;
use crate::error::Result;
use crate::retrieve::DataAccess;

/// Register the three calculation tools
pub fn register_metric_tools(registry: &ToolRegistry, config: &MetricsConfig) {
    registry.register(Arc::new(GrowthRatesTool));
    registry.register(Arc::new(TechnicalIndicatorsTool::new(config)));
    registry.register(Arc::new(FinancialMetricsTool::new(config)));
}

/// Register one tool per data access operation
pub fn register_market_data_tools(
    registry: &ToolRegistry,
    data: Arc<DataAccess>,
    config: &MetricsConfig,
) {
    for kind in MarketDataKind::ALL {
        registry.register(Arc::new(MarketDataTool::new(
            kind,
            Arc::clone(&data),
            config.default_interval.clone(),
        )));
    }
}

/// Build a registry with every tool the configuration enables
///
/// Market data tools use Yahoo Finance and SEC EDGAR.
pub fn build_registry(config: &MetricsConfig) -> Result<ToolRegistry> {
    config.validate()?;

    let registry = ToolRegistry::new();
    register_metric_tools(&registry, config);

    if config.enable_market_data {
        let provider = YahooProvider::new(config.sec_user_agent.clone());
        let data = Arc::new(DataAccess::new(Arc::new(provider)));
        register_market_data_tools(&registry, data, config);
    }

    info!("Registered {} tools", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_metrics_only() {
        let config = MetricsConfig::builder()
            .enable_market_data(false)
            .build()
            .unwrap();
        let registry = build_registry(&config).unwrap();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            [
                "mcp_calculate_financial_metrics",
                "mcp_calculate_growth_rates",
                "mcp_calculate_technical_indicators"
            ]
        );
    }

    #[test]
    fn test_build_registry_with_market_data() {
        let registry = build_registry(&MetricsConfig::default()).unwrap();
        assert_eq!(registry.len(), 9);
        assert!(registry.get("fetch_stock_data").is_some());
        assert!(registry.get("get_financial_statements").is_some());
    }

    #[test]
    fn test_build_registry_rejects_invalid_config() {
        let config = MetricsConfig {
            default_window: 0,
            ..Default::default()
        };
        assert!(build_registry(&config).is_err());
    }

    #[tokio::test]
    async fn test_registry_forwards_results_unchanged() {
        let registry = ToolRegistry::new();
        register_metric_tools(&registry, &MetricsConfig::default());

        let direct = crate::metrics::calculate_growth_rates(&[2.0, 4.0, 8.0]).unwrap();
        let via_registry = registry
            .call("mcp_calculate_growth_rates", serde_json::json!({"series": [2.0, 4.0, 8.0]}))
            .await
            .unwrap();
        assert_eq!(via_registry, serde_json::to_value(direct).unwrap());
    }
}
