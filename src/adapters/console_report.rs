//! Plain-text per-ticker summary printed to stdout.

use std::fmt;
use std::io::Write as _;

use crate::domain::backtest::{BacktestConfig, BatchResult, TickerResult};
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct ConsoleReportAdapter;

impl ConsoleReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

pub fn render(batch: &BatchResult) -> String {
    ConsoleSummary(batch).to_string()
}

/// Text layout of a batch, one block per ticker followed by the skipped list.
pub struct ConsoleSummary<'a>(pub &'a BatchResult);

impl fmt::Display for ConsoleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.0.results {
            fmt_ticker(f, result)?;
        }
        if !self.0.skipped.is_empty() {
            writeln!(f, "\n=== Skipped ===")?;
            for s in &self.0.skipped {
                writeln!(f, "  {}: {}", s.ticker, s.reason)?;
            }
        }
        Ok(())
    }
}

fn fmt_ticker(f: &mut fmt::Formatter<'_>, result: &TickerResult) -> fmt::Result {
    let outcome = &result.outcome;
    writeln!(f, "\n=== {} ===", result.ticker)?;
    writeln!(f, "Trade History:")?;

    if outcome.trades.is_empty() {
        writeln!(f, "  (no closed trades)")?;
    } else {
        writeln!(
            f,
            "  {:<10} {:>10} {:>12} {:<10} {:>10} {:>10}  {}",
            "Entry", "Price", "Shares", "Exit", "Price", "P/L", "Reason"
        )?;
        for t in &outcome.trades {
            writeln!(
                f,
                "  {:<10} {:>10.2} {:>12.4} {:<10} {:>10.2} {:>10.2}  {}",
                t.position.entry_date.to_string(),
                t.position.entry_price,
                t.position.shares,
                t.exit_date.to_string(),
                t.exit_price,
                t.profit_loss,
                t.reason
            )?;
        }
    }

    match &outcome.open_position {
        Some(open) => {
            let p = &open.position;
            writeln!(f, "In-progress Trade:")?;
            writeln!(
                f,
                "  Entry Date: {}, Entry Price: {:.2}",
                p.entry_date, p.entry_price
            )?;
            writeln!(f, "  Shares: {:.4}, Stop Loss: {:.2}", p.shares, p.stop_loss)?;
            writeln!(
                f,
                "  Target Price: {:.2}, Current Price: {:.2}",
                p.target_price, open.latest_price
            )?;
            writeln!(f, "  Unrealized P/L: {:.2}", open.profit_loss)?;
            writeln!(f, "  Unrealized P/L%: {:.2}%", open.profit_loss_pct)?;
        }
        None => writeln!(f, "No active trades.")?,
    }

    writeln!(f, "Available Balance: ${:.2}", outcome.balance)?;
    writeln!(f, "Buy & Hold Balance: ${:.2}", result.buy_and_hold_balance)
}

impl ReportPort for ConsoleReportAdapter {
    fn write(&self, batch: &BatchResult, _config: &BacktestConfig) -> Result<(), BacktestError> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{}", ConsoleSummary(batch))?;
        stdout.flush()?;
        Ok(())
    }
}
