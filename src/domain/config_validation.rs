//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::BacktestError;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `ticker_override` replaces the configured ticker list, so the config may omit it.
pub fn validate_backtest_config(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<(), BacktestError> {
    validate_initial_balance(config)?;
    validate_dates(config)?;
    validate_tickers(config, ticker_override)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_pct(config, "stop_loss_pct", 0.02)?;
    validate_pct(config, "target_pct", 0.05)?;
    validate_rsi_entry(config)?;
    validate_windows(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "initial_balance", 1000.0);
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(
            "backtest",
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?
        .ok_or_else(|| BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
        })?;

    if let Some(end) = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")? {
        if start >= end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` value; a blank value counts as absent.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, BacktestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    field,
                    &format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

fn validate_tickers(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<(), BacktestError> {
    if let Some(raw) = ticker_override {
        parse_tickers(raw)?;
        return Ok(());
    }
    let raw = config
        .get_string("backtest", "tickers")
        .or_else(|| config.get_string("backtest", "ticker"))
        .ok_or_else(|| BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: "tickers".to_string(),
        })?;
    parse_tickers(&raw)?;
    Ok(())
}

fn validate_pct(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), BacktestError> {
    let value = config.get_double("strategy", key, default);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("strategy", key, &format!("{} must be in [0, 1)", key)));
    }
    Ok(())
}

fn validate_rsi_entry(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("strategy", "rsi_entry", 30.0);
    if !(value > 0.0 && value <= 100.0) {
        return Err(invalid(
            "strategy",
            "rsi_entry",
            "rsi_entry must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let get = |key: &str, default: i64| config.get_int("strategy", key, default);

    for (key, default) in [
        ("sma_fast", 50),
        ("sma_slow", 200),
        ("rsi_period", 14),
        ("macd_fast", 12),
        ("macd_slow", 26),
        ("macd_signal", 9),
    ] {
        if get(key, default) < 1 {
            return Err(invalid("strategy", key, &format!("{} must be at least 1", key)));
        }
    }

    if get("sma_fast", 50) >= get("sma_slow", 200) {
        return Err(invalid(
            "strategy",
            "sma_fast",
            "sma_fast must be shorter than sma_slow",
        ));
    }
    if get("macd_fast", 12) >= get("macd_slow", 26) {
        return Err(invalid(
            "strategy",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            MapConfig(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn valid_backtest() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("backtest", "tickers", "AAPL,SPY"),
            ("backtest", "start_date", "2023-01-01"),
            ("backtest", "end_date", "2024-01-01"),
            ("backtest", "initial_balance", "1000"),
        ]
    }

    fn with(
        mut base: Vec<(&'static str, &'static str, &'static str)>,
        extra: (&'static str, &'static str, &'static str),
    ) -> MapConfig {
        base.retain(|(s, k, _)| !(*s == extra.0 && *k == extra.1));
        base.push(extra);
        MapConfig::new(&base)
    }

    #[test]
    fn valid_backtest_config_passes() {
        assert!(validate_backtest_config(&MapConfig::new(&valid_backtest()), None).is_ok());
    }

    #[test]
    fn end_date_is_optional() {
        let mut entries = valid_backtest();
        entries.retain(|(_, k, _)| *k != "end_date");
        assert!(validate_backtest_config(&MapConfig::new(&entries), None).is_ok());
    }

    #[test]
    fn missing_start_date() {
        let mut entries = valid_backtest();
        entries.retain(|(_, k, _)| *k != "start_date");
        let err = validate_backtest_config(&MapConfig::new(&entries), None).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn bad_date_format() {
        let cfg = with(valid_backtest(), ("backtest", "start_date", "2023/01/01"));
        let err = validate_backtest_config(&cfg, None).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn start_after_end() {
        let cfg = with(valid_backtest(), ("backtest", "start_date", "2024-06-01"));
        assert!(validate_backtest_config(&cfg, None).is_err());
    }

    #[test]
    fn non_positive_balance() {
        let cfg = with(valid_backtest(), ("backtest", "initial_balance", "0"));
        let err = validate_backtest_config(&cfg, None).unwrap_err();
        assert!(
            matches!(err, BacktestError::ConfigInvalid { key, .. } if key == "initial_balance")
        );
    }

    #[test]
    fn single_ticker_key_accepted() {
        let mut entries = valid_backtest();
        entries.retain(|(_, k, _)| *k != "tickers");
        entries.push(("backtest", "ticker", "QQQ"));
        assert!(validate_backtest_config(&MapConfig::new(&entries), None).is_ok());
    }

    #[test]
    fn duplicate_tickers_rejected() {
        let cfg = with(valid_backtest(), ("backtest", "tickers", "SPY,spy"));
        let err = validate_backtest_config(&cfg, None).unwrap_err();
        assert!(matches!(err, BacktestError::Universe(_)));
    }

    #[test]
    fn missing_tickers() {
        let mut entries = valid_backtest();
        entries.retain(|(_, k, _)| *k != "tickers");
        let err = validate_backtest_config(&MapConfig::new(&entries), None).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigMissing { key, .. } if key == "tickers"));
    }

    #[test]
    fn ticker_override_replaces_config_list() {
        let mut entries = valid_backtest();
        entries.retain(|(_, k, _)| *k != "tickers");
        let cfg = MapConfig::new(&entries);
        assert!(validate_backtest_config(&cfg, Some("aapl")).is_ok());

        let bad = with(valid_backtest(), ("backtest", "tickers", "SPY,,QQQ"));
        assert!(validate_backtest_config(&bad, Some("SPY")).is_ok());

        let err = validate_backtest_config(&cfg, Some("SPY,spy")).unwrap_err();
        assert!(matches!(err, BacktestError::Universe(_)));
    }

    #[test]
    fn strategy_defaults_pass() {
        assert!(validate_strategy_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn pct_out_of_range() {
        let cfg = MapConfig::new(&[("strategy", "stop_loss_pct", "1.5")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigInvalid { key, .. } if key == "stop_loss_pct"));

        let cfg = MapConfig::new(&[("strategy", "target_pct", "-0.1")]);
        assert!(validate_strategy_config(&cfg).is_err());
    }

    #[test]
    fn rsi_entry_out_of_range() {
        let cfg = MapConfig::new(&[("strategy", "rsi_entry", "0")]);
        assert!(validate_strategy_config(&cfg).is_err());
        let cfg = MapConfig::new(&[("strategy", "rsi_entry", "101")]);
        assert!(validate_strategy_config(&cfg).is_err());
    }

    #[test]
    fn sma_windows_must_be_ordered() {
        let cfg = MapConfig::new(&[
            ("strategy", "sma_fast", "200"),
            ("strategy", "sma_slow", "50"),
        ]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigInvalid { key, .. } if key == "sma_fast"));
    }

    #[test]
    fn zero_window_rejected() {
        let cfg = MapConfig::new(&[("strategy", "rsi_period", "0")]);
        let err = validate_strategy_config(&cfg).unwrap_err();
        assert!(matches!(err, BacktestError::ConfigInvalid { key, .. } if key == "rsi_period"));
    }
}
