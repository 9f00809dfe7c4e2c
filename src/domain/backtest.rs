//! Per-ticker backtest pipeline and the multi-ticker batch.
//!
//! Each ticker gets its own simulator, balance and trade log, so the batch can
//! run tickers on the rayon pool without sharing any mutable state.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::domain::error::BacktestError;
use crate::domain::indicator::{annotate, AnnotatedBar, IndicatorParams};
use crate::domain::ohlcv::PriceBar;
use crate::domain::simulator::{SimulationOutcome, SimulatorConfig, TradeSimulator};
use crate::ports::data_port::DataPort;
use crate::ports::trade_event_port::TradeEventPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub simulator: SimulatorConfig,
    pub indicators: IndicatorParams,
}

impl BacktestConfig {
    pub fn initial_balance(&self) -> f64 {
        self.simulator.initial_balance
    }
}

#[derive(Debug, Clone)]
pub struct TickerResult {
    pub ticker: String,
    pub bars: Vec<AnnotatedBar>,
    pub outcome: SimulationOutcome,
    pub buy_and_hold_balance: f64,
    pub initial_balance: f64,
}

impl TickerResult {
    pub fn strategy_pnl(&self) -> f64 {
        self.outcome.balance - self.initial_balance
    }

    pub fn strategy_pnl_pct(&self) -> f64 {
        pct_of(self.strategy_pnl(), self.initial_balance)
    }

    pub fn buy_and_hold_pnl(&self) -> f64 {
        self.buy_and_hold_balance - self.initial_balance
    }

    pub fn buy_and_hold_pnl_pct(&self) -> f64 {
        pct_of(self.buy_and_hold_pnl(), self.initial_balance)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date())
    }
}

fn pct_of(value: f64, base: f64) -> f64 {
    if base == 0.0 { 0.0 } else { value / base * 100.0 }
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub results: Vec<TickerResult>,
    pub skipped: Vec<SkippedTicker>,
}

/// Value of `initial` invested at the first close and held to the last close.
pub fn buy_and_hold_balance(initial: f64, bars: &[PriceBar]) -> Option<f64> {
    let first = bars.first()?.close;
    let last = bars.last()?.close;
    if first <= 0.0 {
        return None;
    }
    Some(initial / first * last)
}

pub fn run_ticker(
    data_port: &dyn DataPort,
    ticker: &str,
    config: &BacktestConfig,
    events: &dyn TradeEventPort,
) -> Result<TickerResult, BacktestError> {
    let bars = data_port.fetch_bars(ticker, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(BacktestError::DataUnavailable {
            ticker: ticker.to_string(),
        });
    }

    let longest = config.indicators.longest_window();
    if bars.len() < longest {
        tracing::warn!(
            ticker,
            bars = bars.len(),
            required = longest,
            "series shorter than indicator warmup, no entries possible"
        );
    }

    let initial = config.initial_balance();
    let buy_and_hold_balance =
        buy_and_hold_balance(initial, &bars).ok_or_else(|| BacktestError::DataSource {
            reason: format!("{}: first close is not positive", ticker),
        })?;

    let annotated = annotate(&bars, &config.indicators);
    let outcome = TradeSimulator::new(ticker, config.simulator.clone(), events).run(&annotated);

    tracing::info!(
        ticker,
        bars = annotated.len(),
        trades = outcome.trades.len(),
        open = outcome.open_position.is_some(),
        balance = outcome.balance,
        "simulation complete"
    );

    Ok(TickerResult {
        ticker: ticker.to_string(),
        bars: annotated,
        outcome,
        buy_and_hold_balance,
        initial_balance: initial,
    })
}

/// Run every configured ticker. Failures are collected in `skipped`; results keep
/// the configured ticker order.
pub fn run_batch(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    events: &dyn TradeEventPort,
) -> BatchResult {
    let outcomes: Vec<(String, Result<TickerResult, BacktestError>)> = config
        .tickers
        .par_iter()
        .map(|ticker| {
            tracing::info!(ticker = ticker.as_str(), "processing");
            (ticker.clone(), run_ticker(data_port, ticker, config, events))
        })
        .collect();

    let mut batch = BatchResult::default();
    for (ticker, outcome) in outcomes {
        match outcome {
            Ok(result) => batch.results.push(result),
            Err(e) => {
                tracing::warn!(ticker = ticker.as_str(), error = %e, "skipping ticker");
                batch.skipped.push(SkippedTicker {
                    ticker,
                    reason: e.to_string(),
                });
            }
        }
    }
    batch
}
