//! Market data providers
//!
//! [`MarketDataProvider`] is the narrow ticker → data interface the data
//! access layer depends on. [`YahooProvider`] implements it over Yahoo
//! Finance, with financial statements taken from SEC EDGAR.

pub mod sec_edgar;
pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

pub use sec_edgar::SecEdgarClient;
pub use yahoo::YahooProvider;

/// One OHLCV observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// Most recent bar with the listing currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestQuote {
    pub bar: Bar,
    pub currency: Option<String>,
}

/// Cash dividend paid on `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: DateTime<Utc>,
    pub amount: f64,
}

/// Stock split effective on `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub date: DateTime<Utc>,
    pub numerator: f64,
    pub denominator: f64,
}

impl Split {
    /// Shares after the split per share before it
    pub fn ratio(&self) -> Option<f64> {
        (self.denominator != 0.0).then(|| self.numerator / self.denominator)
    }
}

/// Descriptive information about a listed security
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,
}

/// Period-end date → line item → value
pub type Statement = BTreeMap<String, BTreeMap<String, f64>>;

/// Annual income statement, balance sheet and cash flow statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income_statement: Statement,
    pub balance_sheet: Statement,
    pub cash_flow: Statement,
}

impl FinancialStatements {
    pub fn is_empty(&self) -> bool {
        self.income_statement.is_empty() && self.balance_sheet.is_empty() && self.cash_flow.is_empty()
    }
}

/// Source of market and fundamental data for a ticker
///
/// `Ok(None)` or an empty collection means the provider has no data for the
/// ticker; `Err` means the request itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest daily bar and listing currency
    async fn latest_quote(&self, ticker: &str) -> Result<Option<LatestQuote>>;

    /// Bars between `start` and `end` at the given interval (e.g. "1d", "1h")
    async fn history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<Bar>>;

    /// Full dividend history
    async fn dividends(&self, ticker: &str) -> Result<Vec<Dividend>>;

    /// Full split history
    async fn splits(&self, ticker: &str) -> Result<Vec<Split>>;

    /// Name, exchange, sector, industry and currency
    async fn profile(&self, ticker: &str) -> Result<Option<TickerProfile>>;

    /// Annual financial statements
    async fn financial_statements(&self, ticker: &str) -> Result<FinancialStatements>;
}
