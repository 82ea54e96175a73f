//! SEC EDGAR client for annual financial statements
//!
//! Statements are assembled from the XBRL company facts of each company's
//! 10-K filings. SEC requires a User-Agent naming the application and a
//! contact email.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{FinancialStatements, Statement};
use crate::error::{MetricsError, Result};

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Number of most recent fiscal years kept per statement
const MAX_ANNUAL_PERIODS: usize = 4;

/// Shortest span (in days) accepted as a full fiscal year
const MIN_ANNUAL_DAYS: i64 = 300;

/// Line item name and the us-gaap concepts that report it, in priority order
type LineItem = (&'static str, &'static [&'static str]);

const INCOME_STATEMENT: &[LineItem] = &[
    (
        "revenue",
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueNet",
        ],
    ),
    ("cogs", &["CostOfRevenue", "CostOfGoodsAndServicesSold"]),
    ("gross_profit", &["GrossProfit"]),
    ("operating_income", &["OperatingIncomeLoss"]),
    ("net_income", &["NetIncomeLoss"]),
    ("interest_expense", &["InterestExpense"]),
    ("income_tax", &["IncomeTaxExpenseBenefit"]),
    (
        "depreciation_and_amortization",
        &["DepreciationDepletionAndAmortization", "DepreciationAndAmortization"],
    ),
    ("eps", &["EarningsPerShareDiluted", "EarningsPerShareBasic"]),
];

const BALANCE_SHEET: &[LineItem] = &[
    ("total_assets", &["Assets"]),
    ("total_liabilities", &["Liabilities"]),
    ("total_equity", &["StockholdersEquity"]),
    ("current_assets", &["AssetsCurrent"]),
    ("current_liabilities", &["LiabilitiesCurrent"]),
    ("inventory", &["InventoryNet"]),
    ("cash", &["CashAndCashEquivalentsAtCarryingValue"]),
    ("total_debt", &["LongTermDebt", "LongTermDebtNoncurrent"]),
];

const CASH_FLOW: &[LineItem] = &[
    (
        "operating_cash_flow",
        &["NetCashProvidedByUsedInOperatingActivities"],
    ),
    (
        "capital_expenditures",
        &["PaymentsToAcquirePropertyPlantAndEquipment"],
    ),
    ("dividends_paid", &["PaymentsOfDividends", "PaymentsOfDividendsCommonStock"]),
];

/// Company facts response from SEC
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFacts {
    pub cik: u64,
    #[serde(rename = "entityName")]
    pub entity_name: String,
    pub facts: Facts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Facts {
    #[serde(rename = "us-gaap")]
    pub us_gaap: Option<Value>,
}

/// One reported value of a concept
#[derive(Debug, Clone, Deserialize)]
struct FactEntry {
    val: f64,
    end: String,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    fp: Option<String>,
}

impl FactEntry {
    /// Annual 10-K value; durations must span a full year
    fn is_annual(&self) -> bool {
        if self.form.as_deref() != Some("10-K") || self.fp.as_deref() != Some("FY") {
            return false;
        }
        match &self.start {
            None => true,
            Some(start) => match (parse_date(start), parse_date(&self.end)) {
                (Some(start), Some(end)) => (end - start).num_days() >= MIN_ANNUAL_DAYS,
                _ => false,
            },
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// SEC EDGAR API client
#[derive(Clone)]
pub struct SecEdgarClient {
    client: Client,
    user_agent: String,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// # Example
    /// ```ignore
    /// let client = SecEdgarClient::new("MyApp (contact@example.com)");
    /// ```
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MetricsError::Provider(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Look up the CIK for a ticker; `None` if SEC does not list it
    pub async fn get_cik(&self, ticker: &str) -> Result<Option<u64>> {
        let data = self.get_json(SEC_COMPANY_TICKERS_URL).await?;
        Ok(find_cik(&data, ticker))
    }

    /// Get company facts (XBRL financial data)
    pub async fn get_company_facts(&self, cik: u64) -> Result<CompanyFacts> {
        let url = format!("{SEC_BASE_URL}/api/xbrl/companyfacts/CIK{cik:010}.json");
        debug!("Fetching company facts: {}", url);
        let data = self.get_json(&url).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Annual statements for a ticker; empty when SEC has no filings for it
    pub async fn get_financial_statements(&self, ticker: &str) -> Result<FinancialStatements> {
        let Some(cik) = self.get_cik(ticker).await? else {
            debug!("No CIK for ticker {}", ticker);
            return Ok(FinancialStatements::default());
        };
        let facts = self.get_company_facts(cik).await?;
        Ok(extract_statements(&facts))
    }
}

fn find_cik(company_tickers: &Value, ticker: &str) -> Option<u64> {
    company_tickers
        .as_object()?
        .values()
        .find(|company| {
            company
                .get("ticker")
                .and_then(Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case(ticker))
        })
        .and_then(|company| company.get("cik_str"))
        .and_then(|cik| cik.as_u64().or_else(|| cik.as_str()?.parse().ok()))
}

/// Build the three annual statements from company facts
pub fn extract_statements(facts: &CompanyFacts) -> FinancialStatements {
    let Some(us_gaap) = facts.facts.us_gaap.as_ref() else {
        return FinancialStatements::default();
    };

    FinancialStatements {
        income_statement: build_statement(us_gaap, INCOME_STATEMENT),
        balance_sheet: build_statement(us_gaap, BALANCE_SHEET),
        cash_flow: build_statement(us_gaap, CASH_FLOW),
    }
}

fn build_statement(us_gaap: &Value, items: &[LineItem]) -> Statement {
    let mut statement = Statement::new();

    for (item, concepts) in items {
        // Later concepts only fill periods the preferred ones left empty
        for concept in *concepts {
            for entry in annual_entries(us_gaap, concept) {
                statement
                    .entry(entry.end)
                    .or_default()
                    .entry((*item).to_string())
                    .or_insert(entry.val);
            }
        }
    }

    while statement.len() > MAX_ANNUAL_PERIODS {
        statement.pop_first();
    }
    statement
}

/// Annual entries of a concept, latest filing last so it wins on re-reported periods
fn annual_entries(us_gaap: &Value, concept: &str) -> Vec<FactEntry> {
    let Some(units) = us_gaap.get(concept).and_then(|c| c.get("units")) else {
        return Vec::new();
    };
    let Some(entries) = units
        .get("USD")
        .or_else(|| units.get("USD/shares"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut annual: Vec<FactEntry> = entries
        .iter()
        .filter_map(|e| serde_json::from_value::<FactEntry>(e.clone()).ok())
        .filter(FactEntry::is_annual)
        .collect();

    // Keep one value per period end, preferring the most recent filing
    annual.reverse();
    let mut seen = std::collections::HashSet::new();
    annual.retain(|e| seen.insert(e.end.clone()));
    annual
}
