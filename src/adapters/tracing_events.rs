//! `TradeEventPort` backed by `tracing` events.

use crate::domain::position::{ClosedTrade, ExitReason, OpenPositionSnapshot, Position};
use crate::ports::trade_event_port::TradeEventPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventAdapter;

impl TradeEventPort for TracingEventAdapter {
    fn position_opened(&self, ticker: &str, position: &Position) {
        tracing::info!(
            ticker,
            date = %position.entry_date,
            price = position.entry_price,
            shares = position.shares,
            "BUY {:.4} shares at {:.2}",
            position.shares,
            position.entry_price,
        );
    }

    fn position_closed(&self, ticker: &str, trade: &ClosedTrade) {
        let label = match trade.reason {
            ExitReason::StopLoss => "STOP-LOSS hit",
            ExitReason::TargetHit => "TARGET reached",
        };
        tracing::info!(
            ticker,
            date = %trade.exit_date,
            price = trade.exit_price,
            pnl = trade.profit_loss,
            "{} at {:.2}, P/L: {:.2}",
            label,
            trade.exit_price,
            trade.profit_loss,
        );
    }

    fn position_marked(&self, ticker: &str, snapshot: &OpenPositionSnapshot) {
        tracing::info!(
            ticker,
            entry_date = %snapshot.position.entry_date,
            latest_price = snapshot.latest_price,
            pnl = snapshot.profit_loss,
            pnl_pct = snapshot.profit_loss_pct,
            "position still open"
        );
    }
}
