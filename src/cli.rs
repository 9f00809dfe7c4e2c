//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::trade_log_csv::{trade_log_path, write_trade_log};
use crate::adapters::tracing_events::TracingEventAdapter;
use crate::domain::backtest::{run_batch, BacktestConfig, BatchResult, SkippedTicker};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::BacktestError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::simulator::SimulatorConfig;
use crate::domain::universe::{parse_tickers, UniverseError};
use crate::logging::setup_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_HTML_PATH: &str = "dashboard.html";

#[derive(Parser, Debug)]
#[command(name = "dipbuyer", version, about = "Single-asset dip-buying backtester")]
pub struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Ticker or comma-separated tickers, replacing the configured list
        #[arg(short, long)]
        ticker: Option<String>,
        /// Directory for per-ticker trade history CSVs
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Output path for the HTML dashboard
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
}

/// Where the pipeline writes its files.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub log_dir: PathBuf,
    pub html_path: PathBuf,
}

pub fn run(cli: Cli) -> ExitCode {
    setup_logging(cli.log_level.as_str(), cli.json_logs);

    match cli.command {
        Command::Backtest {
            config,
            ticker,
            log_dir,
            html,
            dry_run,
        } => {
            if dry_run {
                match run_dry_run(&config, ticker.as_deref()) {
                    Ok(_) => ExitCode::SUCCESS,
                    Err(e) => fail(&e),
                }
            } else {
                run_backtest(&config, ticker.as_deref(), log_dir, html)
            }
        }
    }
}

fn fail(err: &BacktestError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktestError> {
    FileConfigAdapter::from_file(path).map_err(|e| BacktestError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_and_validate(
    path: &Path,
    ticker_override: Option<&str>,
) -> Result<FileConfigAdapter, BacktestError> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = load_config(path)?;
    validate_backtest_config(&adapter, ticker_override)?;
    validate_strategy_config(&adapter)?;
    Ok(adapter)
}

fn run_backtest(
    config_path: &Path,
    ticker_override: Option<&str>,
    log_dir: Option<PathBuf>,
    html: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_and_validate(config_path, ticker_override) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let bt_config = match build_backtest_config(&adapter, ticker_override) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let paths = resolve_report_paths(&adapter, log_dir, html);
    let data_port = CsvAdapter::new(resolve_data_dir(&adapter));

    match run_backtest_pipeline(&data_port, &bt_config, &paths) {
        Ok(batch) if batch.results.is_empty() => {
            eprintln!("error: no tickers with data to backtest");
            ExitCode::from(5)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Validate the config file and print what a real run would do.
pub fn run_dry_run(
    config_path: &Path,
    ticker_override: Option<&str>,
) -> Result<BacktestConfig, BacktestError> {
    let adapter = load_and_validate(config_path, ticker_override)?;
    let config = build_backtest_config(&adapter, ticker_override)?;
    let paths = resolve_report_paths(&adapter, None, None);

    eprintln!("Config validated successfully");
    eprintln!("\nUniverse:");
    eprintln!("  tickers: {}", config.tickers.join(", "));
    eprintln!("  period:  {} to {} (exclusive)", config.start_date, config.end_date);
    eprintln!("  data:    {}", resolve_data_dir(&adapter).display());

    let sim = &config.simulator;
    eprintln!("\nStrategy:");
    eprintln!("  initial balance: {:.2}", sim.initial_balance);
    eprintln!(
        "  entry: SMA{} > SMA{} and RSI{} < {}",
        config.indicators.sma_fast,
        config.indicators.sma_slow,
        config.indicators.rsi_period,
        sim.rsi_entry
    );
    eprintln!(
        "  exit:  stop-loss {:.2}%, target {:.2}%",
        sim.stop_loss_pct * 100.0,
        sim.target_pct * 100.0
    );
    eprintln!(
        "  MACD({}, {}, {})",
        config.indicators.macd_fast, config.indicators.macd_slow, config.indicators.macd_signal
    );

    eprintln!("\nReports:");
    eprintln!("  trade logs: {}", paths.log_dir.display());
    eprintln!("  dashboard:  {}", paths.html_path.display());

    eprintln!("\nDry run complete: configuration is valid");
    Ok(config)
}

/// Run every ticker, then write trade logs, the console summary and the dashboard.
///
/// Returns the batch even when no ticker produced a result; in that case only the
/// console summary is written. Trade logs that fail to write are added to
/// `skipped`.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    paths: &ReportPaths,
) -> Result<BatchResult, BacktestError> {
    tracing::info!(
        tickers = config.tickers.len(),
        start = %config.start_date,
        end = %config.end_date,
        "running backtest"
    );

    let mut batch = run_batch(data_port, config, &TracingEventAdapter);

    if batch.results.is_empty() {
        ConsoleReportAdapter::new().write(&batch, config)?;
        return Ok(batch);
    }

    // A failed trade log is reported like a skipped ticker; the other logs and the
    // dashboard are still written.
    let mut log_failures = Vec::new();
    for result in &batch.results {
        let path = trade_log_path(&paths.log_dir, &result.ticker);
        match write_trade_log(
            &path,
            &result.outcome.trades,
            result.outcome.open_position.as_ref(),
        ) {
            Ok(()) => {
                tracing::debug!(ticker = result.ticker.as_str(), path = %path.display(), "trade log written")
            }
            Err(e) => {
                tracing::warn!(ticker = result.ticker.as_str(), path = %path.display(), error = %e, "trade log not written");
                log_failures.push(SkippedTicker {
                    ticker: result.ticker.clone(),
                    reason: format!("trade log not written: {}", e),
                });
            }
        }
    }
    batch.skipped.extend(log_failures);

    ConsoleReportAdapter::new().write(&batch, config)?;
    HtmlReportAdapter::new(paths.html_path.clone()).write(&batch, config)?;
    Ok(batch)
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<BacktestConfig, BacktestError> {
    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?
    .ok_or_else(|| BacktestError::ConfigMissing {
        section: "backtest".into(),
        key: "start_date".into(),
    })?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?
    .unwrap_or_else(today);

    if start_date >= end_date {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".into(),
            key: "start_date".into(),
            reason: "start_date must be before end_date".into(),
        });
    }

    let defaults = SimulatorConfig::default();
    let simulator = SimulatorConfig {
        initial_balance: adapter.get_double(
            "backtest",
            "initial_balance",
            defaults.initial_balance,
        ),
        stop_loss_pct: adapter.get_double("strategy", "stop_loss_pct", defaults.stop_loss_pct),
        target_pct: adapter.get_double("strategy", "target_pct", defaults.target_pct),
        rsi_entry: adapter.get_double("strategy", "rsi_entry", defaults.rsi_entry),
    };

    let d = IndicatorParams::default();
    let indicators = IndicatorParams {
        sma_fast: window(adapter, "sma_fast", d.sma_fast)?,
        sma_slow: window(adapter, "sma_slow", d.sma_slow)?,
        rsi_period: window(adapter, "rsi_period", d.rsi_period)?,
        macd_fast: window(adapter, "macd_fast", d.macd_fast)?,
        macd_slow: window(adapter, "macd_slow", d.macd_slow)?,
        macd_signal: window(adapter, "macd_signal", d.macd_signal)?,
    };

    Ok(BacktestConfig {
        tickers: resolve_tickers(ticker_override, adapter)?,
        start_date,
        end_date,
        simulator,
        indicators,
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn window(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, BacktestError> {
    let value = adapter.get_int("strategy", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|&v| v >= 1)
        .ok_or_else(|| BacktestError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("{} must be at least 1", key),
        })
}

/// `--ticker` wins over `tickers`, which wins over `ticker`.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, BacktestError> {
    let raw = ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "tickers"))
        .or_else(|| config.get_string("backtest", "ticker"))
        .ok_or(UniverseError::NoTickers)?;
    Ok(parse_tickers(&raw)?)
}

pub fn resolve_report_paths(
    config: &dyn ConfigPort,
    log_dir: Option<PathBuf>,
    html: Option<PathBuf>,
) -> ReportPaths {
    ReportPaths {
        log_dir: log_dir
            .or_else(|| config.get_string("report", "log_dir").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        html_path: html
            .or_else(|| config.get_string("report", "html_path").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HTML_PATH)),
    }
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("backtest", "data_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backtest_subcommand() {
        let cli = Cli::parse_from([
            "dipbuyer",
            "--log-level",
            "debug",
            "backtest",
            "-c",
            "cfg.ini",
            "--ticker",
            "nvda",
            "--dry-run",
        ]);
        assert_eq!(cli.log_level.as_str(), "debug");
        assert!(!cli.json_logs);
        match cli.command {
            Command::Backtest {
                config,
                ticker,
                log_dir,
                html,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("cfg.ini"));
                assert_eq!(ticker.as_deref(), Some("nvda"));
                assert!(log_dir.is_none());
                assert!(html.is_none());
                assert!(dry_run);
            }
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dipbuyer", "backtest", "-c", "x.ini", "--json-logs"]);
        assert!(cli.json_logs);
        assert_eq!(cli.log_level.as_str(), "info");
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["dipbuyer", "-l", "loud", "backtest", "-c", "x"]).is_err());
    }
}
