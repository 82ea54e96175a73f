//! Period-over-period and compound growth rates

use serde::{Deserialize, Serialize};

use super::{ensure_finite, finite_result};
use crate::error::{MetricsError, Result};

/// Growth rates of a series ordered oldest to newest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    /// Compound rate per period between the first and last value
    pub annualized_growth_rate: f64,
    /// `(curr - prev) / prev` for each consecutive pair
    pub period_growth_rates: Vec<f64>,
}

/// Calculate growth rates for a series (revenue, earnings, ...)
///
/// The annualized rate is `(last / first)^(1 / (n - 1)) - 1`, which equals the
/// geometric mean of `1 + r` over every period, minus one.
///
/// # Errors
///
/// - [`MetricsError::InvalidArgument`] for fewer than two values or a
///   non-finite value
/// - [`MetricsError::Domain`] when any value used as a denominator is zero, or
///   the first and last values have opposite signs
pub fn calculate_growth_rates(series: &[f64]) -> Result<GrowthRates> {
    if series.len() < 2 {
        return Err(MetricsError::InvalidArgument(format!(
            "growth rates need at least 2 values, got {}",
            series.len()
        )));
    }
    ensure_finite(series, "series")?;

    let period_growth_rates = series
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (prev, curr) = (pair[0], pair[1]);
            if prev == 0.0 {
                return Err(MetricsError::Domain(format!(
                    "value at index {i} is zero, growth rate undefined"
                )));
            }
            finite_result((curr - prev) / prev, "period growth rate")
        })
        .collect::<Result<Vec<_>>>()?;

    let first = series[0];
    let last = series[series.len() - 1];
    let ratio = last / first;
    if ratio < 0.0 {
        return Err(MetricsError::Domain(
            "first and last values have opposite signs, compound growth undefined".to_string(),
        ));
    }

    let periods = (series.len() - 1) as f64;
    let annualized_growth_rate =
        finite_result(ratio.powf(1.0 / periods) - 1.0, "annualized growth rate")?;

    Ok(GrowthRates {
        annualized_growth_rate,
        period_growth_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_period_rates() {
        let rates = calculate_growth_rates(&[100.0, 110.0, 121.0]).unwrap();
        assert_eq!(rates.period_growth_rates.len(), 2);
        assert!(approx(rates.period_growth_rates[0], 0.1));
        assert!(approx(rates.period_growth_rates[1], 0.1));
        assert!(approx(rates.annualized_growth_rate, 0.1));
    }

    #[test]
    fn test_one_fewer_rate_than_values() {
        for len in 2..10 {
            let series: Vec<f64> = (1..=len).map(f64::from).collect();
            let rates = calculate_growth_rates(&series).unwrap();
            assert_eq!(rates.period_growth_rates.len(), series.len() - 1);
        }
    }

    #[test]
    fn test_annualized_matches_geometric_mean() {
        let series = [50.0, 80.0, 60.0, 90.0];
        let rates = calculate_growth_rates(&series).unwrap();
        let product: f64 = rates.period_growth_rates.iter().map(|r| 1.0 + r).product();
        let geometric = product.powf(1.0 / 3.0) - 1.0;
        assert!(approx(rates.annualized_growth_rate, geometric));
    }

    #[test]
    fn test_decline_to_zero() {
        let rates = calculate_growth_rates(&[10.0, 0.0]).unwrap();
        assert!(approx(rates.period_growth_rates[0], -1.0));
        assert!(approx(rates.annualized_growth_rate, -1.0));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            calculate_growth_rates(&[1.0]),
            Err(MetricsError::InvalidArgument(_))
        ));
        assert!(matches!(
            calculate_growth_rates(&[]),
            Err(MetricsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_denominator() {
        assert!(matches!(
            calculate_growth_rates(&[0.0, 5.0]),
            Err(MetricsError::Domain(_))
        ));
        assert!(matches!(
            calculate_growth_rates(&[5.0, 0.0, 5.0]),
            Err(MetricsError::Domain(_))
        ));
    }

    #[test]
    fn test_sign_change_is_domain_error() {
        assert!(matches!(
            calculate_growth_rates(&[10.0, -5.0]),
            Err(MetricsError::Domain(_))
        ));
    }

    #[test]
    fn test_negative_mid_series_allowed() {
        let rates = calculate_growth_rates(&[10.0, -5.0, 20.0]).unwrap();
        assert!(approx(rates.period_growth_rates[0], -1.5));
        assert!(approx(rates.period_growth_rates[1], -5.0));
        assert!(approx(rates.annualized_growth_rate, 2.0_f64.sqrt() - 1.0));
    }

    #[test]
    fn test_non_finite_input() {
        assert!(matches!(
            calculate_growth_rates(&[1.0, f64::NAN]),
            Err(MetricsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_overflowing_rate_is_domain_error() {
        assert!(matches!(
            calculate_growth_rates(&[1e-300, 1e300]),
            Err(MetricsError::Domain(_))
        ));
    }
}
