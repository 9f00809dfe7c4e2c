//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Default parameters: fast=12, slow=26, signal=9. All EMAs are seeded from the
//! first value, so every bar of a non-empty series carries a value.

use crate::domain::indicator::ema::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&line, signal);

    MacdSeries {
        ema_fast,
        ema_slow,
        line,
        signal,
    }
}

pub fn calculate_macd_default(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_aligned_with_input() {
        let closes = rising(40);
        let macd = calculate_macd_default(&closes);
        assert_eq!(macd.ema_fast.len(), 40);
        assert_eq!(macd.ema_slow.len(), 40);
        assert_eq!(macd.line.len(), 40);
        assert_eq!(macd.signal.len(), 40);
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let closes = rising(30);
        let macd = calculate_macd(&closes, 3, 5, 2);
        let fast = calculate_ema(&closes, 3);
        let slow = calculate_ema(&closes, 5);

        for i in 0..closes.len() {
            assert!(
                (macd.line[i] - (fast[i] - slow[i])).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_signal_is_ema_of_line() {
        let closes = rising(30);
        let macd = calculate_macd_default(&closes);
        assert_eq!(macd.signal, calculate_ema(&macd.line, DEFAULT_SIGNAL));
    }

    #[test]
    fn macd_starts_at_zero() {
        let macd = calculate_macd_default(&[42.0, 43.0]);
        assert!(macd.line[0].abs() < f64::EPSILON);
        assert!(macd.signal[0].abs() < f64::EPSILON);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let macd = calculate_macd_default(&rising(60));
        assert!(macd.line[59] > 0.0);
    }

    #[test]
    fn macd_empty() {
        let macd = calculate_macd_default(&[]);
        assert!(macd.line.is_empty());
        assert!(macd.signal.is_empty());
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }
}
