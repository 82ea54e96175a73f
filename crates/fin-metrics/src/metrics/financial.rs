//! Financial ratios from a single-period snapshot of named fields

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::finite_result;
use crate::error::{MetricsError, Result};

/// Supported financial metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialMetric {
    GrossMargin,
    OperatingMargin,
    NetProfitMargin,
    Ebitda,
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    BookValuePerShare,
    FreeCashFlow,
    CashFlowMargin,
    Roe,
    Roa,
    PeRatio,
    PbRatio,
    DividendYield,
}

impl FinancialMetric {
    pub const ALL: [FinancialMetric; 15] = [
        FinancialMetric::GrossMargin,
        FinancialMetric::OperatingMargin,
        FinancialMetric::NetProfitMargin,
        FinancialMetric::Ebitda,
        FinancialMetric::DebtToEquity,
        FinancialMetric::CurrentRatio,
        FinancialMetric::QuickRatio,
        FinancialMetric::BookValuePerShare,
        FinancialMetric::FreeCashFlow,
        FinancialMetric::CashFlowMargin,
        FinancialMetric::Roe,
        FinancialMetric::Roa,
        FinancialMetric::PeRatio,
        FinancialMetric::PbRatio,
        FinancialMetric::DividendYield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialMetric::GrossMargin => "gross_margin",
            FinancialMetric::OperatingMargin => "operating_margin",
            FinancialMetric::NetProfitMargin => "net_profit_margin",
            FinancialMetric::Ebitda => "ebitda",
            FinancialMetric::DebtToEquity => "debt_to_equity",
            FinancialMetric::CurrentRatio => "current_ratio",
            FinancialMetric::QuickRatio => "quick_ratio",
            FinancialMetric::BookValuePerShare => "book_value_per_share",
            FinancialMetric::FreeCashFlow => "free_cash_flow",
            FinancialMetric::CashFlowMargin => "cash_flow_margin",
            FinancialMetric::Roe => "roe",
            FinancialMetric::Roa => "roa",
            FinancialMetric::PeRatio => "pe_ratio",
            FinancialMetric::PbRatio => "pb_ratio",
            FinancialMetric::DividendYield => "dividend_yield",
        }
    }

    /// Fields the metric reads from the financial data
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FinancialMetric::GrossMargin => &["revenue", "cogs"],
            FinancialMetric::OperatingMargin => &["operating_income", "revenue"],
            FinancialMetric::NetProfitMargin => &["net_income", "revenue"],
            FinancialMetric::Ebitda => &[
                "net_income",
                "interest_expense",
                "income_tax",
                "depreciation",
                "amortization",
            ],
            FinancialMetric::DebtToEquity => &["total_debt", "total_equity"],
            FinancialMetric::CurrentRatio => &["current_assets", "current_liabilities"],
            FinancialMetric::QuickRatio => &["current_assets", "inventory", "current_liabilities"],
            FinancialMetric::BookValuePerShare => &["total_equity", "shares_outstanding"],
            FinancialMetric::FreeCashFlow => &["operating_cash_flow", "capital_expenditures"],
            FinancialMetric::CashFlowMargin => &["operating_cash_flow", "revenue"],
            FinancialMetric::Roe => &["net_income", "total_equity"],
            FinancialMetric::Roa => &["net_income", "total_assets"],
            FinancialMetric::PeRatio => &["share_price", "eps"],
            FinancialMetric::PbRatio => &["share_price", "total_equity", "shares_outstanding"],
            FinancialMetric::DividendYield => &["dividends_per_share", "share_price"],
        }
    }

    fn compute(self, data: &Fields<'_>) -> Result<f64> {
        match self {
            FinancialMetric::GrossMargin => {
                let revenue = data.get("revenue")?;
                ratio(revenue - data.get("cogs")?, revenue, "revenue")
            }
            FinancialMetric::OperatingMargin => {
                ratio(data.get("operating_income")?, data.get("revenue")?, "revenue")
            }
            FinancialMetric::NetProfitMargin => {
                ratio(data.get("net_income")?, data.get("revenue")?, "revenue")
            }
            FinancialMetric::Ebitda => ebitda(data),
            FinancialMetric::DebtToEquity => {
                ratio(data.get("total_debt")?, data.get("total_equity")?, "total_equity")
            }
            FinancialMetric::CurrentRatio => ratio(
                data.get("current_assets")?,
                data.get("current_liabilities")?,
                "current_liabilities",
            ),
            FinancialMetric::QuickRatio => ratio(
                data.get("current_assets")? - data.get("inventory")?,
                data.get("current_liabilities")?,
                "current_liabilities",
            ),
            FinancialMetric::BookValuePerShare => book_value_per_share(data),
            FinancialMetric::FreeCashFlow => finite_result(
                data.get("operating_cash_flow")? - data.get("capital_expenditures")?,
                "free_cash_flow",
            ),
            FinancialMetric::CashFlowMargin => {
                ratio(data.get("operating_cash_flow")?, data.get("revenue")?, "revenue")
            }
            FinancialMetric::Roe => {
                ratio(data.get("net_income")?, data.get("total_equity")?, "total_equity")
            }
            FinancialMetric::Roa => {
                ratio(data.get("net_income")?, data.get("total_assets")?, "total_assets")
            }
            FinancialMetric::PeRatio => ratio(data.get("share_price")?, data.get("eps")?, "eps"),
            FinancialMetric::PbRatio => {
                let book_value = book_value_per_share(data)?;
                ratio(data.get("share_price")?, book_value, "book value per share")
            }
            FinancialMetric::DividendYield => ratio(
                data.get("dividends_per_share")?,
                data.get("share_price")?,
                "share_price",
            ),
        }
    }
}

impl fmt::Display for FinancialMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialMetric {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        FinancialMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| {
                let supported: Vec<_> = FinancialMetric::ALL.iter().map(|m| m.as_str()).collect();
                MetricsError::InvalidArgument(format!(
                    "Unsupported financial metric: {s}. Supported: {}",
                    supported.join(", ")
                ))
            })
    }
}

const DEPRECIATION_AND_AMORTIZATION: &str = "depreciation_and_amortization";

/// Numeric view over a financial data record
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn contains(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| !v.is_null())
    }

    /// Read a field; `null` counts as absent
    fn get(&self, name: &str) -> Result<f64> {
        let value = self
            .0
            .get(name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| MetricsError::MissingField(name.to_string()))?;

        value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                MetricsError::InvalidArgument(format!("field {name} is not a number: {value}"))
            })
    }
}

/// Net income plus interest, tax, depreciation and amortization
///
/// A combined `depreciation_and_amortization` field (as filed with SEC) is used
/// when neither `depreciation` nor `amortization` is given.
fn ebitda(data: &Fields<'_>) -> Result<f64> {
    let combined_only = data.contains(DEPRECIATION_AND_AMORTIZATION)
        && !data.contains("depreciation")
        && !data.contains("amortization");
    let d_and_a = if combined_only {
        data.get(DEPRECIATION_AND_AMORTIZATION)?
    } else {
        data.get("depreciation")? + data.get("amortization")?
    };

    finite_result(
        data.get("net_income")? + data.get("interest_expense")? + data.get("income_tax")? + d_and_a,
        "ebitda",
    )
}

fn ratio(numerator: f64, denominator: f64, denominator_name: &str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(MetricsError::Domain(format!(
            "division by zero: {denominator_name} is 0"
        )));
    }
    finite_result(numerator / denominator, "ratio")
}

fn book_value_per_share(data: &Fields<'_>) -> Result<f64> {
    ratio(
        data.get("total_equity")?,
        data.get("shares_outstanding")?,
        "shares_outstanding",
    )
}

/// Calculate one financial metric from a single-period record
///
/// `window` is accepted for parity with the technical indicator interface
/// and has no effect. The result maps the metric name to its value, e.g.
/// `{"gross_margin": 0.6}`.
pub fn calculate_financial_metric(
    financial_data: &Map<String, Value>,
    indicator: &str,
    _window: usize,
) -> Result<BTreeMap<String, f64>> {
    let metric: FinancialMetric = indicator.parse()?;
    let value = metric.compute(&Fields(financial_data))?;
    Ok(BTreeMap::from([(metric.as_str().to_string(), value)]))
}
