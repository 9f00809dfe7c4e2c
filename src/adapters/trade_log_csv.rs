//! Per-ticker trade history CSV writer.
//!
//! Columns: entry_date, entry_price, shares, stop_loss, target_price, status,
//! cost_of_trade, exit_date, exit_price, profit_loss, reason.
//!
//! Rows are the closed trades in close order. A position still held when the
//! series ends adds one trailing OPEN row from its mark-to-market snapshot, with
//! the exit columns empty; consumers that want closed trades only filter on
//! `status == CLOSED`.

use crate::domain::error::BacktestError;
use crate::domain::position::{ClosedTrade, OpenPositionSnapshot, Position};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct TradeLogRow {
    entry_date: NaiveDate,
    entry_price: f64,
    shares: f64,
    stop_loss: f64,
    target_price: f64,
    status: String,
    cost_of_trade: f64,
    exit_date: Option<NaiveDate>,
    exit_price: Option<f64>,
    profit_loss: Option<f64>,
    reason: Option<String>,
}

impl TradeLogRow {
    fn entry(position: &Position, status: String) -> Self {
        TradeLogRow {
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            shares: position.shares,
            stop_loss: position.stop_loss,
            target_price: position.target_price,
            status,
            cost_of_trade: position.cost_of_trade,
            exit_date: None,
            exit_price: None,
            profit_loss: None,
            reason: None,
        }
    }
}

impl From<&ClosedTrade> for TradeLogRow {
    fn from(trade: &ClosedTrade) -> Self {
        TradeLogRow {
            exit_date: Some(trade.exit_date),
            exit_price: Some(trade.exit_price),
            profit_loss: Some(trade.profit_loss),
            reason: Some(trade.reason.to_string()),
            ..TradeLogRow::entry(&trade.position, trade.status().to_string())
        }
    }
}

impl From<&OpenPositionSnapshot> for TradeLogRow {
    fn from(snapshot: &OpenPositionSnapshot) -> Self {
        TradeLogRow::entry(&snapshot.position, snapshot.status().to_string())
    }
}

/// `<log_dir>/<TICKER>_trade_history.csv`
pub fn trade_log_path(log_dir: &Path, ticker: &str) -> PathBuf {
    log_dir.join(format!("{}_trade_history.csv", ticker))
}

pub fn write_trade_log(
    path: &Path,
    trades: &[ClosedTrade],
    open_position: Option<&OpenPositionSnapshot>,
) -> Result<(), BacktestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    if trades.is_empty() && open_position.is_none() {
        wtr.write_record([
            "entry_date",
            "entry_price",
            "shares",
            "stop_loss",
            "target_price",
            "status",
            "cost_of_trade",
            "exit_date",
            "exit_price",
            "profit_loss",
            "reason",
        ])?;
    }
    for trade in trades {
        wtr.serialize(TradeLogRow::from(trade))?;
    }
    if let Some(snapshot) = open_position {
        wtr.serialize(TradeLogRow::from(snapshot))?;
    }
    wtr.flush()?;
    Ok(())
}
