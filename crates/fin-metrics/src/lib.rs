//! Financial metrics engine and market data access
//!
//! This crate provides:
//!
//! - Growth rates over a series (period-over-period and compound)
//! - Technical indicators on closing prices (SMA, EMA, RSI, MACD, volatility)
//! - Financial ratios from a single-period record (margins, leverage,
//!   liquidity, returns, valuation)
//! - Market data wrappers over Yahoo Finance and SEC EDGAR that return plain
//!   JSON mappings
//! - Tools exposing all of the above through a [`fin_tools::ToolRegistry`]
//!
//! # Example
//!
//! ```rust,no_run
//! use fin_metrics::{MetricsConfig, build_registry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MetricsConfig::from_env()?;
//!     let registry = build_registry(&config)?;
//!
//!     let result = registry
//!         .call(
//!             "mcp_calculate_financial_metrics",
//!             json!({"financial_data": {"revenue": 100, "cogs": 40}, "indicator": "gross_margin"}),
//!         )
//!         .await?;
//!     println!("{result}");
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod retrieve;
pub mod tools;

pub use api::{MarketDataProvider, SecEdgarClient, YahooProvider};
pub use config::MetricsConfig;
pub use error::{MetricsError, Result};
pub use retrieve::DataAccess;
pub use tools::{build_registry, register_market_data_tools, register_metric_tools};
