//! Data access wrappers
//!
//! Each wrapper performs one provider query for a ticker and reshapes the
//! result into a plain JSON object with dates rendered as text. Failures and
//! missing data come back as `{"error": "..."}` rather than as `Err`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{Bar, MarketDataProvider, Statement};

const DEFAULT_CURRENCY: &str = "USD";

/// Data access layer over a market data provider
#[derive(Clone)]
pub struct DataAccess {
    provider: Arc<dyn MarketDataProvider>,
}

fn error_value(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

fn no_data(ticker: &str) -> Value {
    error_value(format!("No data found for ticker {ticker}"))
}

fn parse_day(text: &str, field: &str) -> Result<DateTime<Utc>, Value> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| error_value(format!("Invalid {field} '{text}': {e} (expected YYYY-MM-DD)")))
}

fn bar_record(bar: &Bar) -> Value {
    json!({
        "Date": bar.timestamp.to_rfc3339(),
        "Open": bar.open,
        "High": bar.high,
        "Low": bar.low,
        "Close": bar.close,
        "Volume": bar.volume,
        "Adj Close": bar.adjclose,
    })
}

fn day_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn statement_value(statement: Statement) -> Value {
    json!(statement)
}

impl DataAccess {
    /// Create a data access layer over `provider`
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Latest price for a ticker
    ///
    /// Returns `{ticker, price, currency, timestamp}`.
    pub async fn get_current_price(&self, ticker: &str) -> Value {
        match self.provider.latest_quote(ticker).await {
            Ok(Some(quote)) => json!({
                "ticker": ticker,
                "price": quote.bar.close,
                "currency": quote.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                "timestamp": quote.bar.timestamp.to_rfc3339(),
            }),
            Ok(None) => no_data(ticker),
            Err(e) => {
                warn!("Price lookup failed for {}: {}", ticker, e);
                error_value(format!("Failed to fetch price for ticker {ticker}: {e}"))
            }
        }
    }

    /// Historical bars for each ticker between two `YYYY-MM-DD` dates
    ///
    /// Returns ticker → list of records; a ticker without data maps to `[]`.
    pub async fn fetch_stock_data(
        &self,
        tickers: &[String],
        start_date: &str,
        end_date: &str,
        interval: &str,
    ) -> Value {
        let start = match parse_day(start_date, "start_date") {
            Ok(start) => start,
            Err(err) => return err,
        };
        let end = match parse_day(end_date, "end_date") {
            Ok(end) => end,
            Err(err) => return err,
        };
        if start >= end {
            return error_value(format!(
                "start_date {start_date} must be before end_date {end_date}"
            ));
        }

        let mut result = Map::new();
        for ticker in tickers {
            let records: Vec<Value> = match self.provider.history(ticker, start, end, interval).await {
                Ok(bars) => bars.iter().map(bar_record).collect(),
                Err(e) => {
                    warn!("History lookup failed for {}: {}", ticker, e);
                    Vec::new()
                }
            };
            debug!("Fetched {} records for {}", records.len(), ticker);
            result.insert(ticker.clone(), Value::Array(records));
        }
        Value::Object(result)
    }

    /// Dividend history as date → amount
    pub async fn get_dividends(&self, ticker: &str) -> Value {
        match self.provider.dividends(ticker).await {
            Ok(dividends) => {
                let map: Map<String, Value> = dividends
                    .iter()
                    .map(|d| (day_key(d.date), json!(d.amount)))
                    .collect();
                Value::Object(map)
            }
            Err(e) => {
                warn!("Dividend lookup failed for {}: {}", ticker, e);
                error_value(format!("Failed to fetch dividends for ticker {ticker}: {e}"))
            }
        }
    }

    /// Split history as date → ratio
    pub async fn get_splits(&self, ticker: &str) -> Value {
        match self.provider.splits(ticker).await {
            Ok(splits) => {
                let map: Map<String, Value> = splits
                    .iter()
                    .filter_map(|s| Some((day_key(s.date), json!(s.ratio()?))))
                    .collect();
                Value::Object(map)
            }
            Err(e) => {
                warn!("Split lookup failed for {}: {}", ticker, e);
                error_value(format!("Failed to fetch splits for ticker {ticker}: {e}"))
            }
        }
    }

    /// Name, exchange, sector, industry and currency of a ticker
    pub async fn get_ticker_info(&self, ticker: &str) -> Value {
        match self.provider.profile(ticker).await {
            Ok(Some(profile)) => json!({
                "ticker": ticker,
                "name": profile.name.unwrap_or_default(),
                "exchange": profile.exchange.unwrap_or_default(),
                "sector": profile.sector.unwrap_or_default(),
                "industry": profile.industry.unwrap_or_default(),
                "currency": profile.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            }),
            Ok(None) => no_data(ticker),
            Err(e) => {
                warn!("Profile lookup failed for {}: {}", ticker, e);
                error_value(format!("Failed to fetch info for ticker {ticker}: {e}"))
            }
        }
    }

    /// Annual income statement, balance sheet and cash flow
    pub async fn get_financial_statements(&self, ticker: &str) -> Value {
        match self.provider.financial_statements(ticker).await {
            Ok(statements) if statements.is_empty() => error_value(format!(
                "No financial statements found for ticker {ticker}"
            )),
            Ok(statements) => json!({
                "financial_statements": statement_value(statements.income_statement),
                "balance_sheet": statement_value(statements.balance_sheet),
                "cash_flow": statement_value(statements.cash_flow),
            }),
            Err(e) => {
                warn!("Statement lookup failed for {}: {}", ticker, e);
                error_value(format!(
                    "Failed to fetch financial statements for ticker {ticker}: {e}"
                ))
            }
        }
    }
}
