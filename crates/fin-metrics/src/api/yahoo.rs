//! Yahoo Finance market data provider

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::{
    Bar, Dividend, FinancialStatements, LatestQuote, MarketDataProvider, SecEdgarClient, Split,
    TickerProfile,
};
use crate::error::{MetricsError, Result};

const YAHOO_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

// Yahoo rejects requests without a browser-like agent
const YAHOO_USER_AGENT: &str = "Mozilla/5.0 (compatible; finmetrics/0.1)";

/// Yahoo Finance provider; financial statements come from SEC EDGAR
#[derive(Clone)]
pub struct YahooProvider {
    http: Client,
    sec: SecEdgarClient,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    symbol: String,
    #[serde(default)]
    shortname: Option<String>,
    #[serde(default)]
    longname: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
}

fn yahoo_error(err: impl std::fmt::Display) -> MetricsError {
    MetricsError::Provider(format!("Yahoo Finance error: {err}"))
}

fn to_utc(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| yahoo_error(format!("invalid timestamp {timestamp}")))
}

fn to_offset(datetime: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(datetime.timestamp())
        .map_err(|e| yahoo_error(format!("invalid timestamp: {e}")))
}

fn to_bar(quote: &yahoo::Quote) -> Result<Bar> {
    Ok(Bar {
        timestamp: to_utc(i64::try_from(quote.timestamp).map_err(yahoo_error)?)?,
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        volume: quote.volume,
        adjclose: quote.adjclose,
    })
}

impl YahooProvider {
    /// Create a provider; `sec_user_agent` identifies this application to SEC EDGAR
    pub fn new(sec_user_agent: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            sec: SecEdgarClient::new(sec_user_agent),
        }
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(yahoo_error)
    }

    /// Full daily range, which carries the dividend and split events
    async fn max_range(&self, ticker: &str) -> Result<yahoo::YResponse> {
        Self::connector()?
            .get_quote_range(ticker, "1d", "max")
            .await
            .map_err(yahoo_error)
    }

    async fn search(&self, ticker: &str) -> Result<Option<SearchQuote>> {
        let response = self
            .http
            .get(YAHOO_SEARCH_URL)
            .query(&[("q", ticker), ("quotesCount", "5"), ("newsCount", "0")])
            .header("User-Agent", YAHOO_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(yahoo_error(format!("search returned {}", response.status())));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .quotes
            .into_iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(ticker)))
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn latest_quote(&self, ticker: &str) -> Result<Option<LatestQuote>> {
        let response = Self::connector()?
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(yahoo_error)?;

        // An empty chart is "no data", not a failure
        let Ok(quote) = response.last_quote() else {
            debug!("No quotes returned for {}", ticker);
            return Ok(None);
        };
        let currency = response.metadata().ok().and_then(|m| m.currency);

        Ok(Some(LatestQuote {
            bar: to_bar(&quote)?,
            currency,
        }))
    }

    async fn history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<Bar>> {
        let response = Self::connector()?
            .get_quote_history_interval(ticker, to_offset(start)?, to_offset(end)?, interval)
            .await
            .map_err(yahoo_error)?;

        let Ok(quotes) = response.quotes() else {
            debug!("No history returned for {}", ticker);
            return Ok(Vec::new());
        };
        quotes.iter().map(to_bar).collect()
    }

    async fn dividends(&self, ticker: &str) -> Result<Vec<Dividend>> {
        let response = self.max_range(ticker).await?;
        let dividends = response.dividends().unwrap_or_default();

        dividends
            .iter()
            .map(|d| {
                Ok(Dividend {
                    date: to_utc(i64::try_from(d.date).map_err(yahoo_error)?)?,
                    amount: d.amount,
                })
            })
            .collect()
    }

    async fn splits(&self, ticker: &str) -> Result<Vec<Split>> {
        let response = self.max_range(ticker).await?;
        let splits = response.splits().unwrap_or_default();

        splits
            .iter()
            .map(|s| {
                Ok(Split {
                    date: to_utc(i64::try_from(s.date).map_err(yahoo_error)?)?,
                    numerator: s.numerator as f64,
                    denominator: s.denominator as f64,
                })
            })
            .collect()
    }

    async fn profile(&self, ticker: &str) -> Result<Option<TickerProfile>> {
        let Some(found) = self.search(ticker).await? else {
            return Ok(None);
        };

        let currency = match self.latest_quote(ticker).await {
            Ok(Some(quote)) => quote.currency,
            Ok(None) => None,
            Err(e) => {
                debug!("Currency lookup failed for {}: {}", ticker, e);
                None
            }
        };

        Ok(Some(TickerProfile {
            name: found.shortname.or(found.longname),
            exchange: found.exchange,
            sector: found.sector,
            industry: found.industry,
            currency,
        }))
    }

    async fn financial_statements(&self, ticker: &str) -> Result<FinancialStatements> {
        self.sec.get_financial_statements(ticker).await
    }
}
