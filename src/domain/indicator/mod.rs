//! Technical indicators and the annotated bar series.
//!
//! Each indicator is a pure function of an ordered close series and returns a
//! vector aligned index-for-index with its input. Rolling indicators report
//! `None` while their window is still filling; the simulator treats `None` as
//! "condition false".

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::{closes, PriceBar};
use chrono::NaiveDate;

/// Indicator windows used by [`annotate`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            sma_fast: 50,
            sma_slow: 200,
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorParams {
    /// Bars needed before every rolling indicator is defined.
    pub fn longest_window(&self) -> usize {
        self.sma_fast.max(self.sma_slow).max(self.rsi_period)
    }
}

/// A price bar together with its indicator readings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBar {
    pub bar: PriceBar,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

impl AnnotatedBar {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

/// Compute every indicator over `bars` and zip them back onto the bars.
pub fn annotate(bars: &[PriceBar], params: &IndicatorParams) -> Vec<AnnotatedBar> {
    let close = closes(bars);
    let sma_fast = sma::calculate_sma(&close, params.sma_fast);
    let sma_slow = sma::calculate_sma(&close, params.sma_slow);
    let rsi = rsi::calculate_rsi(&close, params.rsi_period);
    let macd = macd::calculate_macd(
        &close,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    );

    bars.iter()
        .enumerate()
        .map(|(i, bar)| AnnotatedBar {
            bar: bar.clone(),
            sma_fast: sma_fast[i],
            sma_slow: sma_slow[i],
            rsi: rsi[i],
            ema_fast: macd.ema_fast[i],
            ema_slow: macd.ema_slow[i],
            macd: macd.line[i],
            macd_signal: macd.signal[i],
        })
        .collect()
}
