#![allow(dead_code)]

use chrono::NaiveDate;
use dipbuyer::domain::error::BacktestError;
pub use dipbuyer::domain::ohlcv::PriceBar;
use dipbuyer::domain::position::{ClosedTrade, OpenPositionSnapshot, Position};
use dipbuyer::ports::data_port::DataPort;
use dipbuyer::ports::trade_event_port::TradeEventPort;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, BacktestError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date < end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Captures simulator events as short strings, e.g. `"AAPL open 2024-01-01"`.
#[derive(Default)]
pub struct RecordingEvents {
    pub events: Mutex<Vec<String>>,
}

impl RecordingEvents {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl TradeEventPort for RecordingEvents {
    fn position_opened(&self, ticker: &str, position: &Position) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} open {}", ticker, position.entry_date));
    }

    fn position_closed(&self, ticker: &str, trade: &ClosedTrade) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} close {} {}", ticker, trade.exit_date, trade.reason));
    }

    fn position_marked(&self, ticker: &str, snapshot: &OpenPositionSnapshot) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} marked {}", ticker, snapshot.latest_price));
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2020, 1, 1)
}

pub fn make_bar(date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000.0,
    }
}

/// One bar per calendar day starting at `start_date()`.
pub fn series(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(start_date() + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn flat_closes(len: usize, price: f64) -> Vec<f64> {
    vec![price; len]
}

/// 300 closes built so the default rule fires exactly once, at index 200.
///
/// Bars 0..=190 rise by 1 from 100, bars 191..=200 fall by 1 (RSI14 drops to
/// 28.57 at 200 while SMA50 stays above SMA200), 201..=204 keep falling by 1,
/// bar 205 is `exit_close`, then the series climbs from 300.
pub fn dip_closes(exit_close: f64) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..=190).map(|i| 100.0 + i as f64).collect();
    for _ in 191..=204 {
        let last = *closes.last().unwrap();
        closes.push(last - 1.0);
    }
    closes.push(exit_close);
    for i in 206..300 {
        closes.push(300.0 + (i - 206) as f64);
    }
    closes
}

pub const DIP_ENTRY_INDEX: usize = 200;
pub const DIP_EXIT_INDEX: usize = 205;
