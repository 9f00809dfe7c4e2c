//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for dipbuyer.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data returned for {ticker}")]
    DataUnavailable { ticker: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) | BacktestError::Csv(_) | BacktestError::Report { .. } => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. }
            | BacktestError::Universe(_) => 2,
            BacktestError::DataSource { .. } => 3,
            BacktestError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = BacktestError::DataUnavailable {
            ticker: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "no data returned for AAPL");

        let err = BacktestError::ConfigInvalid {
            section: "strategy".into(),
            key: "target_pct".into(),
            reason: "must be in [0, 1)".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] target_pct: must be in [0, 1)"
        );
    }

    #[test]
    fn universe_error_converts() {
        let err: BacktestError = UniverseError::DuplicateTicker("SPY".into()).into();
        assert!(matches!(err, BacktestError::Universe(_)));
        assert_eq!(err.to_string(), "duplicate ticker: SPY");
    }

    #[test]
    fn exit_codes_are_distinct_per_category() {
        use std::process::ExitCode;

        let io: ExitCode = (&BacktestError::Io(std::io::Error::other("x"))).into();
        let cfg: ExitCode = (&BacktestError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })
            .into();
        let data: ExitCode = (&BacktestError::DataSource { reason: "x".into() }).into();

        assert_eq!(io, ExitCode::from(1));
        assert_eq!(cfg, ExitCode::from(2));
        assert_eq!(data, ExitCode::from(3));
    }
}
