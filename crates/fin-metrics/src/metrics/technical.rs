//! Technical indicators over closing prices

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ta::{
    Next,
    indicators::{
        ExponentialMovingAverage, MovingAverageConvergenceDivergence, RelativeStrengthIndex,
    },
};

use super::{ensure_finite, finite_result};
use crate::error::{MetricsError, Result};

/// MACD fast EMA period
pub const MACD_FAST: usize = 12;
/// MACD slow EMA period
pub const MACD_SLOW: usize = 26;
/// MACD signal line period
pub const MACD_SIGNAL: usize = 9;

/// Trading days used to annualize volatility
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Supported technical indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Sma,
    Ema,
    Rsi,
    Macd,
    Volatility,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Sma,
        Indicator::Ema,
        Indicator::Rsi,
        Indicator::Macd,
        Indicator::Volatility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Sma => "sma",
            Indicator::Ema => "ema",
            Indicator::Rsi => "rsi",
            Indicator::Macd => "macd",
            Indicator::Volatility => "volatility",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Indicator::ALL
            .into_iter()
            .find(|i| i.as_str() == name)
            .ok_or_else(|| {
                MetricsError::InvalidArgument(format!(
                    "Unsupported indicator: {s}. Supported: sma, ema, rsi, macd, volatility"
                ))
            })
    }
}

/// MACD line, signal line and histogram, one value per price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Rolling volatility of simple returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySeries {
    /// Sample standard deviation of each full window of returns
    pub rolling: Vec<f64>,
    /// Latest rolling value scaled by `sqrt(252)`
    pub annualized: f64,
}

/// Indicator values, serialized as `{"<indicator>": values}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorOutput {
    Sma(Vec<f64>),
    Ema(Vec<f64>),
    Rsi(Vec<f64>),
    Macd(MacdSeries),
    Volatility(VolatilitySeries),
}

/// Calculate a technical indicator on closing prices ordered oldest to newest
///
/// `window` applies to sma, ema, rsi and volatility; MACD always uses
/// 12/26/9.
pub fn calculate_technical_indicators(
    price_data: &[f64],
    indicator: &str,
    window: usize,
) -> Result<IndicatorOutput> {
    let indicator: Indicator = indicator.parse()?;
    if window == 0 {
        return Err(MetricsError::InvalidArgument(
            "window must be greater than 0".to_string(),
        ));
    }
    ensure_finite(price_data, "price_data")?;

    match indicator {
        Indicator::Sma => sma(price_data, window).map(IndicatorOutput::Sma),
        Indicator::Ema => ema(price_data, window).map(IndicatorOutput::Ema),
        Indicator::Rsi => rsi(price_data, window).map(IndicatorOutput::Rsi),
        Indicator::Macd => macd(price_data).map(IndicatorOutput::Macd),
        Indicator::Volatility => volatility(price_data, window).map(IndicatorOutput::Volatility),
    }
}

fn require_len(price_data: &[f64], min: usize, indicator: Indicator) -> Result<()> {
    if price_data.len() < min {
        return Err(MetricsError::InvalidArgument(format!(
            "{indicator} needs at least {min} prices, got {}",
            price_data.len()
        )));
    }
    Ok(())
}

fn ta_error(err: impl fmt::Display) -> MetricsError {
    MetricsError::InvalidArgument(err.to_string())
}

/// Simple moving average over each full window
///
/// Each value is the mean of its own window, not a running sum.
fn sma(price_data: &[f64], window: usize) -> Result<Vec<f64>> {
    require_len(price_data, window, Indicator::Sma)?;

    let len = window as f64;
    price_data
        .windows(window)
        .map(|w| finite_result(w.iter().sum::<f64>() / len, "sma"))
        .collect()
}

/// Exponential moving average seeded with the first price
fn ema(price_data: &[f64], window: usize) -> Result<Vec<f64>> {
    require_len(price_data, window, Indicator::Ema)?;

    let mut ema = ExponentialMovingAverage::new(window).map_err(ta_error)?;
    price_data
        .iter()
        .map(|&close| finite_result(ema.next(close), "ema"))
        .collect()
}

/// RSI after the first `window` price changes
fn rsi(price_data: &[f64], window: usize) -> Result<Vec<f64>> {
    require_len(price_data, window + 1, Indicator::Rsi)?;

    let mut rsi = RelativeStrengthIndex::new(window).map_err(ta_error)?;
    price_data
        .iter()
        .map(|&close| rsi.next(close))
        .skip(window)
        .map(|value| finite_result(value, "rsi"))
        .collect()
}

fn macd(price_data: &[f64]) -> Result<MacdSeries> {
    require_len(price_data, MACD_SLOW, Indicator::Macd)?;

    let mut macd = MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .map_err(ta_error)?;

    let mut series = MacdSeries {
        macd: Vec::with_capacity(price_data.len()),
        signal: Vec::with_capacity(price_data.len()),
        histogram: Vec::with_capacity(price_data.len()),
    };
    for &close in price_data {
        let out = macd.next(close);
        series.macd.push(finite_result(out.macd, "macd")?);
        series.signal.push(finite_result(out.signal, "macd signal")?);
        series.histogram.push(finite_result(out.histogram, "macd histogram")?);
    }
    Ok(series)
}

fn volatility(price_data: &[f64], window: usize) -> Result<VolatilitySeries> {
    if window < 2 {
        return Err(MetricsError::InvalidArgument(
            "volatility window must be at least 2".to_string(),
        ));
    }
    require_len(price_data, window + 1, Indicator::Volatility)?;

    let returns = price_data
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                return Err(MetricsError::Domain(
                    "zero price, return undefined".to_string(),
                ));
            }
            finite_result(pair[1] / pair[0] - 1.0, "return")
        })
        .collect::<Result<Vec<_>>>()?;

    let rolling = returns
        .windows(window)
        .map(|w| finite_result(sample_std_dev(w), "volatility"))
        .collect::<Result<Vec<_>>>()?;

    // require_len guarantees at least one full window
    let latest = rolling.last().copied().unwrap_or_default();
    let annualized = finite_result(latest * TRADING_DAYS_PER_YEAR.sqrt(), "annualized volatility")?;

    Ok(VolatilitySeries { rolling, annualized })
}

fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sma_window_3() {
        let out = calculate_technical_indicators(&[1.0, 2.0, 3.0, 4.0, 5.0], "sma", 3).unwrap();
        assert_eq!(out, IndicatorOutput::Sma(vec![2.0, 3.0, 4.0]));

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!({"sma": [2.0, 3.0, 4.0]}));
    }

    #[test]
    fn test_sma_large_value_does_not_skew_later_windows() {
        let out = calculate_technical_indicators(&[1e17, 1.0, 1.0, 1.0], "sma", 2).unwrap();
        assert_eq!(out, IndicatorOutput::Sma(vec![5e16, 1.0, 1.0]));
    }

    #[test]
    fn test_sma_overflow_is_domain_error() {
        let result = calculate_technical_indicators(&[1.7e308, 1.7e308, 1.0], "sma", 2);
        assert!(matches!(result, Err(MetricsError::Domain(_))));
    }

    #[test]
    fn test_rsi_flat_step_is_domain_error() {
        // window 1: a flat step leaves both averages at zero
        let result = calculate_technical_indicators(&[1.0, 2.0, 2.0], "rsi", 1);
        assert!(matches!(result, Err(MetricsError::Domain(_))));
    }

    #[test]
    fn test_volatility_window_one_rejected() {
        let result = calculate_technical_indicators(&[1.0, 2.0, 3.0], "volatility", 1);
        assert!(matches!(result, Err(MetricsError::InvalidArgument(msg)) if msg.contains("at least 2")));
    }

    #[test]
    fn test_indicator_name_case_insensitive() {
        let out = calculate_technical_indicators(&[1.0, 2.0, 3.0], "SMA", 3).unwrap();
        assert_eq!(out, IndicatorOutput::Sma(vec![2.0]));
    }

    #[test]
    fn test_ema() {
        let out = calculate_technical_indicators(&[1.0, 2.0, 3.0], "ema", 3).unwrap();
        let IndicatorOutput::Ema(values) = out else {
            panic!("Expected EMA output");
        };
        // k = 0.5, seeded with the first price
        assert_eq!(values.len(), 3);
        assert!(approx(values[0], 1.0));
        assert!(approx(values[1], 1.5));
        assert!(approx(values[2], 2.25));
    }

    #[test]
    fn test_rsi_bounds_and_trend() {
        let prices: Vec<f64> = (1..=30).map(f64::from).collect();
        let out = calculate_technical_indicators(&prices, "rsi", 14).unwrap();
        let IndicatorOutput::Rsi(values) = out else {
            panic!("Expected RSI output");
        };
        assert_eq!(values.len(), prices.len() - 14);
        assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
        assert!(*values.last().unwrap() > 70.0);
    }

    #[test]
    fn test_macd_lengths() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i).sin()).collect();
        let out = calculate_technical_indicators(&prices, "macd", 14).unwrap();
        let IndicatorOutput::Macd(series) = out else {
            panic!("Expected MACD output");
        };
        assert_eq!(series.macd.len(), 40);
        assert_eq!(series.signal.len(), 40);
        for i in 0..40 {
            assert!(approx(series.histogram[i], series.macd[i] - series.signal[i]));
        }
    }

    #[test]
    fn test_macd_constant_prices_is_flat() {
        let prices = vec![50.0; 30];
        let out = calculate_technical_indicators(&prices, "macd", 14).unwrap();
        let IndicatorOutput::Macd(series) = out else {
            panic!("Expected MACD output");
        };
        assert!(series.macd.iter().all(|v| approx(*v, 0.0)));
    }

    #[test]
    fn test_volatility() {
        // constant 10% returns
        let prices = [100.0, 110.0, 121.0, 133.1];
        let out = calculate_technical_indicators(&prices, "volatility", 2).unwrap();
        let IndicatorOutput::Volatility(series) = out else {
            panic!("Expected volatility output");
        };
        assert_eq!(series.rolling.len(), 2);
        assert!(series.rolling.iter().all(|v| v.abs() < 1e-9));
        assert!(series.annualized.abs() < 1e-9);
    }

    #[test]
    fn test_volatility_known_value() {
        // returns 0.1 and -0.1 -> sample std = sqrt(0.02)
        let prices = [100.0, 110.0, 99.0];
        let out = calculate_technical_indicators(&prices, "volatility", 2).unwrap();
        let IndicatorOutput::Volatility(series) = out else {
            panic!("Expected volatility output");
        };
        assert!(approx(series.rolling[0], 0.02_f64.sqrt()));
        assert!(approx(series.annualized, 0.02_f64.sqrt() * 252.0_f64.sqrt()));
    }

    #[test]
    fn test_volatility_zero_price() {
        let result = calculate_technical_indicators(&[1.0, 0.0, 1.0], "volatility", 2);
        assert!(matches!(result, Err(MetricsError::Domain(_))));
    }

    #[test]
    fn test_unknown_indicator() {
        let result = calculate_technical_indicators(&[1.0, 2.0], "bollinger", 2);
        assert!(matches!(result, Err(MetricsError::InvalidArgument(msg)) if msg.contains("bollinger")));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            calculate_technical_indicators(&[1.0, 2.0], "sma", 3),
            Err(MetricsError::InvalidArgument(_))
        ));
        assert!(matches!(
            calculate_technical_indicators(&[1.0; 14], "rsi", 14),
            Err(MetricsError::InvalidArgument(_))
        ));
        assert!(matches!(
            calculate_technical_indicators(&[1.0; 25], "macd", 14),
            Err(MetricsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_window() {
        assert!(matches!(
            calculate_technical_indicators(&[1.0, 2.0], "ema", 0),
            Err(MetricsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_indicator_parse_display() {
        for indicator in Indicator::ALL {
            assert_eq!(indicator.to_string().parse::<Indicator>().unwrap(), indicator);
        }
    }
}
