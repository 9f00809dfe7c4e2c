//! Open positions, closed trades and the mark-to-market view of an open position.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "OPEN"),
            TradeStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TargetHit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP-LOSS"),
            ExitReason::TargetHit => write!(f, "TARGET HIT"),
        }
    }
}

/// An all-in long position.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: f64,
    pub stop_loss: f64,
    pub target_price: f64,
    pub cost_of_trade: f64,
}

impl Position {
    /// Commit `cost` at `price`; stop and target are offsets from the entry price.
    pub fn open(
        entry_date: NaiveDate,
        price: f64,
        cost: f64,
        stop_loss_pct: f64,
        target_pct: f64,
    ) -> Self {
        Position {
            entry_date,
            entry_price: price,
            shares: cost / price,
            stop_loss: price * (1.0 - stop_loss_pct),
            target_price: price * (1.0 + target_pct),
            cost_of_trade: cost,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.shares
    }

    /// Stop-loss wins when both thresholds are breached.
    pub fn exit_reason(&self, price: f64) -> Option<ExitReason> {
        if price <= self.stop_loss {
            Some(ExitReason::StopLoss)
        } else if price >= self.target_price {
            Some(ExitReason::TargetHit)
        } else {
            None
        }
    }

    pub fn close(self, exit_date: NaiveDate, exit_price: f64, reason: ExitReason) -> ClosedTrade {
        let profit_loss = self.unrealized_pnl(exit_price);
        ClosedTrade {
            position: self,
            exit_date,
            exit_price,
            profit_loss,
            reason,
        }
    }

    pub fn mark_to_market(&self, latest_price: f64) -> OpenPositionSnapshot {
        let profit_loss = self.unrealized_pnl(latest_price);
        let profit_loss_pct = if self.cost_of_trade != 0.0 {
            profit_loss / self.cost_of_trade * 100.0
        } else {
            0.0
        };
        OpenPositionSnapshot {
            position: self.clone(),
            latest_price,
            profit_loss,
            profit_loss_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub position: Position,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub profit_loss: f64,
    pub reason: ExitReason,
}

impl ClosedTrade {
    pub fn status(&self) -> TradeStatus {
        TradeStatus::Closed
    }

    pub fn proceeds(&self) -> f64 {
        self.position.market_value(self.exit_price)
    }
}

/// A still-open position valued at the last available close.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPositionSnapshot {
    pub position: Position,
    pub latest_price: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
}

impl OpenPositionSnapshot {
    pub fn status(&self) -> TradeStatus {
        TradeStatus::Open
    }
}
