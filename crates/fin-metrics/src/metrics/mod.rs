//! Metrics engine: pure calculations over caller-supplied numbers
//!
//! Every function validates its input and returns a typed, serializable
//! result or a [`MetricsError`]. Results never contain NaN or infinity.

pub mod financial;
pub mod growth;
pub mod technical;

pub use financial::{FinancialMetric, calculate_financial_metric};
pub use growth::{GrowthRates, calculate_growth_rates};
pub use technical::{
    Indicator, IndicatorOutput, MacdSeries, VolatilitySeries, calculate_technical_indicators,
};

use crate::error::{MetricsError, Result};

/// Reject NaN and infinite inputs
fn ensure_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MetricsError::InvalidArgument(format!(
            "{what} contains a non-finite value at index {index}"
        ))),
        None => Ok(()),
    }
}

/// Guard a computed value against overflow
fn finite_result(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricsError::Domain(format!("{what} is not a finite number")))
    }
}
