//! Tools wrapping the metrics engine

use async_trait::async_trait;
use fin_tools::schema::{array, integer, number, object, string_enum, with_default};
use fin_tools::{Result as ToolResult, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::MetricsConfig;
use crate::metrics::{
    FinancialMetric, Indicator, calculate_financial_metric, calculate_growth_rates,
    calculate_technical_indicators,
};

fn to_result(value: &impl Serialize) -> ToolResult<Value> {
    serde_json::to_value(value).map_err(|e| fin_tools::Error::ProcessingFailed(e.to_string()))
}

/// Growth rates of a series
pub struct GrowthRatesTool;

#[derive(Debug, Deserialize)]
struct GrowthParams {
    series: Vec<f64>,
}

#[async_trait]
impl Tool for GrowthRatesTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: GrowthParams = serde_json::from_value(params)?;
        debug!("Calculating growth rates over {} values", params.series.len());

        let rates = calculate_growth_rates(&params.series)?;
        to_result(&rates)
    }

    fn name(&self) -> &str {
        "mcp_calculate_growth_rates"
    }

    fn description(&self) -> &str {
        "Calculate period-over-period growth rates and the compound annualized growth rate \
         of a series ordered oldest to newest (e.g. yearly revenue)."
    }

    fn input_schema(&self) -> Value {
        object(
            json!({
                "series": array(number(None), Some("Values ordered oldest to newest")),
            }),
            &["series"],
        )
    }
}

/// Technical indicators over closing prices
pub struct TechnicalIndicatorsTool {
    default_window: usize,
}

#[derive(Debug, Deserialize)]
struct TechnicalParams {
    price_data: Vec<f64>,
    indicator: String,
    #[serde(default)]
    window: Option<usize>,
}

impl TechnicalIndicatorsTool {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            default_window: config.default_window,
        }
    }
}

#[async_trait]
impl Tool for TechnicalIndicatorsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: TechnicalParams = serde_json::from_value(params)?;
        let window = params.window.unwrap_or(self.default_window);
        debug!(
            "Calculating {} over {} prices (window {})",
            params.indicator,
            params.price_data.len(),
            window
        );

        let output = calculate_technical_indicators(&params.price_data, &params.indicator, window)?;
        to_result(&output)
    }

    fn name(&self) -> &str {
        "mcp_calculate_technical_indicators"
    }

    fn description(&self) -> &str {
        "Calculate a technical indicator (sma, ema, rsi, macd, volatility) on closing prices \
         ordered oldest to newest. MACD always uses 12/26/9 periods."
    }

    fn input_schema(&self) -> Value {
        let names: Vec<&str> = Indicator::ALL.iter().map(Indicator::as_str).collect();
        object(
            json!({
                "price_data": array(number(None), Some("Closing prices ordered oldest to newest")),
                "indicator": string_enum(&names, Some("Indicator to calculate")),
                "window": with_default(
                    integer(Some("Lookback window in periods")),
                    json!(self.default_window),
                ),
            }),
            &["price_data", "indicator"],
        )
    }
}

/// Financial ratios from a single-period record
pub struct FinancialMetricsTool {
    default_window: usize,
}

#[derive(Debug, Deserialize)]
struct FinancialParams {
    financial_data: Map<String, Value>,
    indicator: String,
    #[serde(default)]
    window: Option<usize>,
}

impl FinancialMetricsTool {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            default_window: config.default_window,
        }
    }
}

#[async_trait]
impl Tool for FinancialMetricsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: FinancialParams = serde_json::from_value(params)?;
        debug!("Calculating {} from {} fields", params.indicator, params.financial_data.len());

        let metric = calculate_financial_metric(
            &params.financial_data,
            &params.indicator,
            params.window.unwrap_or(self.default_window),
        )?;
        to_result(&metric)
    }

    fn name(&self) -> &str {
        "mcp_calculate_financial_metrics"
    }

    fn description(&self) -> &str {
        "Calculate a financial ratio (margins, leverage, liquidity, returns, valuation) from a \
         flat record of field name to number, e.g. {\"revenue\": 100, \"cogs\": 40}."
    }

    fn input_schema(&self) -> Value {
        let names: Vec<&str> = FinancialMetric::ALL.iter().map(FinancialMetric::as_str).collect();
        json!({
            "type": "object",
            "properties": {
                "financial_data": {
                    "type": "object",
                    "description": "Field name to numeric value for a single period",
                    "additionalProperties": { "type": "number" }
                },
                "indicator": string_enum(&names, Some("Metric to calculate")),
                "window": with_default(
                    integer(Some("Accepted for interface parity; ignored")),
                    json!(self.default_window),
                ),
            },
            "required": ["financial_data", "indicator"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_tools::Error;

    #[test]
    fn test_tool_metadata() {
        let config = MetricsConfig::default();

        let growth = GrowthRatesTool;
        assert_eq!(growth.name(), "mcp_calculate_growth_rates");
        assert_eq!(growth.input_schema()["required"], json!(["series"]));

        let technical = TechnicalIndicatorsTool::new(&config);
        assert_eq!(technical.name(), "mcp_calculate_technical_indicators");
        let schema = technical.input_schema();
        assert_eq!(schema["properties"]["window"]["default"], 14);
        assert_eq!(schema["properties"]["indicator"]["enum"][3], "macd");

        let financial = FinancialMetricsTool::new(&config);
        assert_eq!(financial.name(), "mcp_calculate_financial_metrics");
        assert_eq!(financial.input_schema()["type"], "object");
    }

    #[tokio::test]
    async fn test_growth_rates_tool() {
        let result = GrowthRatesTool
            .execute(json!({"series": [100.0, 110.0, 121.0]}))
            .await
            .unwrap();

        let rates = result["period_growth_rates"].as_array().unwrap();
        assert_eq!(rates.len(), 2);
        assert!((result["annualized_growth_rate"].as_f64().unwrap() - 0.1).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_growth_rates_tool_rejects_bad_params() {
        let err = GrowthRatesTool
            .execute(json!({"values": [1.0, 2.0]}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_technical_tool_default_window() {
        let config = MetricsConfig::builder().default_window(3).build().unwrap();
        let tool = TechnicalIndicatorsTool::new(&config);

        let result = tool
            .execute(json!({"price_data": [1.0, 2.0, 3.0, 4.0, 5.0], "indicator": "sma"}))
            .await
            .unwrap();
        assert_eq!(result, json!({"sma": [2.0, 3.0, 4.0]}));
    }

    #[tokio::test]
    async fn test_technical_tool_unknown_indicator() {
        let tool = TechnicalIndicatorsTool::new(&MetricsConfig::default());
        let err = tool
            .execute(json!({"price_data": [1.0, 2.0], "indicator": "bollinger", "window": 2}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(ref msg) if msg.contains("bollinger")));
    }

    #[tokio::test]
    async fn test_financial_tool() {
        let tool = FinancialMetricsTool::new(&MetricsConfig::default());
        let result = tool
            .execute(json!({
                "financial_data": {"revenue": 100.0, "cogs": 40.0},
                "indicator": "gross_margin"
            }))
            .await
            .unwrap();
        assert_eq!(result, json!({"gross_margin": 0.6}));
    }

    #[tokio::test]
    async fn test_financial_tool_domain_error() {
        let tool = FinancialMetricsTool::new(&MetricsConfig::default());
        let err = tool
            .execute(json!({
                "financial_data": {"net_income": 10.0, "total_equity": 0.0},
                "indicator": "roe"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProcessingFailed(_)));
    }
}
