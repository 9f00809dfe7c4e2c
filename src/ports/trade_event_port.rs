//! Trade event port: the simulator's logger.

use crate::domain::position::{ClosedTrade, OpenPositionSnapshot, Position};

/// Receives the lifecycle events of one simulation run.
///
/// Shared across tickers when the batch runs in parallel, hence `Send + Sync`.
pub trait TradeEventPort: Send + Sync {
    fn position_opened(&self, ticker: &str, position: &Position);

    fn position_closed(&self, ticker: &str, trade: &ClosedTrade);

    fn position_marked(&self, ticker: &str, snapshot: &OpenPositionSnapshot);
}
