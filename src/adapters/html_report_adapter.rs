//! HTML dashboard adapter implementing ReportPort.
//!
//! Single self-contained page: backtest period, in-progress trades, and the
//! strategy versus buy-and-hold comparison per ticker.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::domain::backtest::{BacktestConfig, BatchResult};
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

const STYLE: &str = "
        body { font-family: Arial, sans-serif; margin: 20px; }
        table, th, td { border: 1px solid black; border-collapse: collapse; padding: 5px; }
        table { width: 90%; margin-bottom: 20px; }
        h1, h2 { color: #333; }
        td.neg { color: #b91c1c; }
        td.pos { color: #15803d; }
";

pub struct HtmlReportAdapter {
    output_path: PathBuf,
}

impl HtmlReportAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn pnl_cell(value: f64, suffix: &str) -> String {
    let class = if value < 0.0 { "neg" } else { "pos" };
    format!("<td class=\"{}\">{:.2}{}</td>", class, value, suffix)
}

pub fn render(batch: &BatchResult, config: &BacktestConfig) -> String {
    Dashboard { batch, config }.to_string()
}

pub struct Dashboard<'a> {
    pub batch: &'a BatchResult,
    pub config: &'a BacktestConfig,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<html><head><title>Trading Dashboard</title><style>{}</style></head><body>",
            STYLE
        )?;
        f.write_str("<h1>Trading Dashboard</h1>")?;
        write!(
            f,
            "<p>Backtest from <b>{}</b> to <b>{}</b></p>",
            self.config.start_date, self.config.end_date
        )?;
        self.fmt_in_progress(f)?;
        self.fmt_comparison(f)?;
        self.fmt_skipped(f)?;
        f.write_str("</body></html>\n")
    }
}

impl Dashboard<'_> {
    fn fmt_in_progress(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<h2>In-Progress Trades</h2>\n<table><tr>")?;
        f.write_str("<th>Ticker</th><th>Entry Date</th><th>Entry Price</th><th>Current Price</th>")?;
        f.write_str("<th>Shares</th><th>Unrealized P/L</th><th>Unrealized P/L%</th>")?;
        f.write_str("<th>Stop Loss</th><th>Target Price</th></tr>\n")?;
        for result in &self.batch.results {
            if let Some(open) = &result.outcome.open_position {
                let p = &open.position;
                writeln!(
                    f,
                    "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.4}</td>{}{}<td>{:.2}</td><td>{:.2}</td></tr>",
                    escape(&result.ticker),
                    p.entry_date,
                    p.entry_price,
                    open.latest_price,
                    p.shares,
                    pnl_cell(open.profit_loss, ""),
                    pnl_cell(open.profit_loss_pct, "%"),
                    p.stop_loss,
                    p.target_price,
                )?;
            }
        }
        f.write_str("</table>\n")
    }

    fn fmt_comparison(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<h2>Strategy vs. Buy &amp; Hold</h2>\n<table><tr>")?;
        f.write_str("<th>Ticker</th><th>Closed Trades</th><th>Strategy Final Balance</th>")?;
        f.write_str("<th>Strategy P/L</th><th>Strategy P/L%</th><th>BnH Final Balance</th>")?;
        f.write_str("<th>BnH P/L</th><th>BnH P/L%</th></tr>\n")?;
        for result in &self.batch.results {
            writeln!(
                f,
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td>{}{}<td>{:.2}</td>{}{}</tr>",
                escape(&result.ticker),
                result.outcome.trades.len(),
                result.outcome.balance,
                pnl_cell(result.strategy_pnl(), ""),
                pnl_cell(result.strategy_pnl_pct(), "%"),
                result.buy_and_hold_balance,
                pnl_cell(result.buy_and_hold_pnl(), ""),
                pnl_cell(result.buy_and_hold_pnl_pct(), "%"),
            )?;
        }
        f.write_str("</table>\n")
    }

    fn fmt_skipped(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.batch.skipped.is_empty() {
            return Ok(());
        }
        f.write_str("<h2>Skipped Tickers</h2>\n<ul>\n")?;
        for s in &self.batch.skipped {
            writeln!(f, "<li>{}: {}</li>", escape(&s.ticker), escape(&s.reason))?;
        }
        f.write_str("</ul>\n")
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, batch: &BatchResult, config: &BacktestConfig) -> Result<(), BacktestError> {
        let html = render(batch, config);
        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output_path, html).map_err(|e| BacktestError::Report {
            reason: format!("failed to write {}: {}", self.output_path.display(), e),
        })?;
        tracing::info!(path = %self.output_path.display(), "HTML dashboard written");
        Ok(())
    }
}
