//! Tools wrapping the data access layer

use async_trait::async_trait;
use fin_tools::schema::{array, object, string, with_default};
use fin_tools::{Result as ToolResult, Tool};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::retrieve::DataAccess;

/// Data access operations exposed as tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataKind {
    CurrentPrice,
    StockData,
    Dividends,
    Splits,
    TickerInfo,
    FinancialStatements,
}

impl MarketDataKind {
    pub const ALL: [MarketDataKind; 6] = [
        MarketDataKind::CurrentPrice,
        MarketDataKind::StockData,
        MarketDataKind::Dividends,
        MarketDataKind::Splits,
        MarketDataKind::TickerInfo,
        MarketDataKind::FinancialStatements,
    ];

    fn name(self) -> &'static str {
        match self {
            MarketDataKind::CurrentPrice => "get_current_price",
            MarketDataKind::StockData => "fetch_stock_data",
            MarketDataKind::Dividends => "get_dividends",
            MarketDataKind::Splits => "get_splits",
            MarketDataKind::TickerInfo => "get_ticker_info",
            MarketDataKind::FinancialStatements => "get_financial_statements",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MarketDataKind::CurrentPrice => {
                "Get the latest price of a ticker with its currency and quote time."
            }
            MarketDataKind::StockData => {
                "Fetch historical OHLCV bars for one or more tickers between two dates \
                 (YYYY-MM-DD). Tickers without data map to an empty list."
            }
            MarketDataKind::Dividends => "Get the dividend history of a ticker as date to amount.",
            MarketDataKind::Splits => "Get the split history of a ticker as date to split ratio.",
            MarketDataKind::TickerInfo => {
                "Get the name, exchange, sector, industry and currency of a ticker."
            }
            MarketDataKind::FinancialStatements => {
                "Get annual income statement, balance sheet and cash flow figures of a ticker \
                 from SEC EDGAR filings."
            }
        }
    }
}

/// One data access operation registered under its own name
pub struct MarketDataTool {
    kind: MarketDataKind,
    data: Arc<DataAccess>,
    default_interval: String,
}

#[derive(Debug, Deserialize)]
struct TickerParams {
    ticker: String,
}

#[derive(Debug, Deserialize)]
struct StockDataParams {
    tickers: Vec<String>,
    start_date: String,
    end_date: String,
    #[serde(default)]
    interval: Option<String>,
}

impl MarketDataTool {
    /// Create a tool; `default_interval` applies when `fetch_stock_data` omits one
    pub fn new(kind: MarketDataKind, data: Arc<DataAccess>, default_interval: impl Into<String>) -> Self {
        Self {
            kind,
            data,
            default_interval: default_interval.into(),
        }
    }

    fn ticker(params: Value) -> ToolResult<String> {
        let params: TickerParams = serde_json::from_value(params)?;
        normalize_ticker(&params.ticker)
    }
}

fn normalize_ticker(ticker: &str) -> ToolResult<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(fin_tools::Error::InvalidParameters(
            "ticker must not be empty".to_string(),
        ));
    }
    Ok(ticker)
}

#[async_trait]
impl Tool for MarketDataTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        debug!("Executing {}", self.kind.name());

        let result = match self.kind {
            MarketDataKind::CurrentPrice => self.data.get_current_price(&Self::ticker(params)?).await,
            MarketDataKind::StockData => {
                let params: StockDataParams = serde_json::from_value(params)?;
                let tickers = params
                    .tickers
                    .iter()
                    .map(|t| normalize_ticker(t))
                    .collect::<ToolResult<Vec<_>>>()?;
                let interval = params.interval.as_deref().unwrap_or(&self.default_interval);
                self.data
                    .fetch_stock_data(&tickers, &params.start_date, &params.end_date, interval)
                    .await
            }
            MarketDataKind::Dividends => self.data.get_dividends(&Self::ticker(params)?).await,
            MarketDataKind::Splits => self.data.get_splits(&Self::ticker(params)?).await,
            MarketDataKind::TickerInfo => self.data.get_ticker_info(&Self::ticker(params)?).await,
            MarketDataKind::FinancialStatements => {
                self.data
                    .get_financial_statements(&Self::ticker(params)?)
                    .await
            }
        };

        Ok(result)
    }

    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.description()
    }

    fn input_schema(&self) -> Value {
        match self.kind {
            MarketDataKind::StockData => object(
                json!({
                    "tickers": array(string(None), Some("Ticker symbols, e.g. [\"AAPL\", \"MSFT\"]")),
                    "start_date": string(Some("First day, YYYY-MM-DD")),
                    "end_date": string(Some("Day after the last bar, YYYY-MM-DD")),
                    "interval": with_default(
                        string(Some("Bar interval (1d, 1wk, 1mo, 1h, ...)")),
                        json!(self.default_interval),
                    ),
                }),
                &["tickers", "start_date", "end_date"],
            ),
            _ => object(
                json!({ "ticker": string(Some("Ticker symbol, e.g. AAPL")) }),
                &["ticker"],
            ),
        }
    }
}
