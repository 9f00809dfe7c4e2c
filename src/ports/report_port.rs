//! Report rendering port trait.

use crate::domain::backtest::{BacktestConfig, BatchResult};
use crate::domain::error::BacktestError;

/// Port for presenting the results of a batch run.
pub trait ReportPort {
    fn write(&self, batch: &BatchResult, config: &BacktestConfig) -> Result<(), BacktestError>;
}
