//! Price history access port trait.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort: Send + Sync {
    /// Daily bars for `symbol` with `start_date <= date < end_date`, in date order.
    /// An unknown symbol or an empty range yields an empty vector.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, BacktestError>;
}
