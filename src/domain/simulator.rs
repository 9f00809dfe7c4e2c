//! Trade simulation state machine.
//!
//! Walks an annotated series once in date order. Each bar first evaluates the
//! entry rule (only while flat) and then the exit rule (only while holding),
//! so a position opened on a bar can also close on that same bar.
//!
//! Entry: `sma_fast > sma_slow && rsi < rsi_entry`, all-in at the close.
//! Exit: close <= stop_loss → STOP-LOSS, else close >= target → TARGET HIT.
//! A position still open after the last bar is marked to market, not closed.

use crate::domain::indicator::AnnotatedBar;
use crate::domain::position::{ClosedTrade, OpenPositionSnapshot, Position};
use crate::ports::trade_event_port::TradeEventPort;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub initial_balance: f64,
    pub stop_loss_pct: f64,
    pub target_pct: f64,
    pub rsi_entry: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            initial_balance: 1000.0,
            stop_loss_pct: 0.02,
            target_pct: 0.05,
            rsi_entry: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimState {
    Flat,
    InPosition(Position),
}

impl SimState {
    pub fn position(&self) -> Option<&Position> {
        match self {
            SimState::Flat => None,
            SimState::InPosition(pos) => Some(pos),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub trades: Vec<ClosedTrade>,
    pub open_position: Option<OpenPositionSnapshot>,
    /// Cash on hand; excludes the value of `open_position`.
    pub balance: f64,
}

pub struct TradeSimulator<'a> {
    ticker: String,
    config: SimulatorConfig,
    events: &'a dyn TradeEventPort,
    state: SimState,
    balance: f64,
    trades: Vec<ClosedTrade>,
    last_close: Option<f64>,
}

impl<'a> TradeSimulator<'a> {
    pub fn new(
        ticker: impl Into<String>,
        config: SimulatorConfig,
        events: &'a dyn TradeEventPort,
    ) -> Self {
        let balance = config.initial_balance;
        TradeSimulator {
            ticker: ticker.into(),
            config,
            events,
            state: SimState::Flat,
            balance,
            trades: Vec::new(),
            last_close: None,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn trades(&self) -> &[ClosedTrade] {
        &self.trades
    }

    pub fn entry_signal(&self, bar: &AnnotatedBar) -> bool {
        match (bar.sma_fast, bar.sma_slow, bar.rsi) {
            (Some(fast), Some(slow), Some(rsi)) => fast > slow && rsi < self.config.rsi_entry,
            _ => false,
        }
    }

    /// Advance the state machine by one bar.
    pub fn step(&mut self, bar: &AnnotatedBar) {
        let price = bar.close();
        self.last_close = Some(price);

        if matches!(self.state, SimState::Flat) && self.entry_signal(bar) {
            self.enter(bar);
        }

        let state = std::mem::replace(&mut self.state, SimState::Flat);
        self.state = match state {
            SimState::InPosition(pos) => match pos.exit_reason(price) {
                Some(reason) => {
                    let trade = pos.close(bar.date(), price, reason);
                    self.balance += trade.proceeds();
                    self.events.position_closed(&self.ticker, &trade);
                    self.trades.push(trade);
                    SimState::Flat
                }
                None => SimState::InPosition(pos),
            },
            SimState::Flat => SimState::Flat,
        };
    }

    fn enter(&mut self, bar: &AnnotatedBar) {
        let price = bar.close();
        let cost = self.balance;
        if !(price > 0.0 && price.is_finite() && cost > 0.0) {
            return;
        }

        let position = Position::open(
            bar.date(),
            price,
            cost,
            self.config.stop_loss_pct,
            self.config.target_pct,
        );
        self.balance -= cost;
        self.events.position_opened(&self.ticker, &position);
        self.state = SimState::InPosition(position);
    }

    /// Mark any open position at the last seen close and hand back the results.
    pub fn finish(self) -> SimulationOutcome {
        let open_position = match (&self.state, self.last_close) {
            (SimState::InPosition(pos), Some(latest)) => {
                let snapshot = pos.mark_to_market(latest);
                self.events.position_marked(&self.ticker, &snapshot);
                Some(snapshot)
            }
            _ => None,
        };

        SimulationOutcome {
            trades: self.trades,
            open_position,
            balance: self.balance,
        }
    }

    pub fn run(mut self, bars: &[AnnotatedBar]) -> SimulationOutcome {
        for bar in bars {
            self.step(bar);
        }
        self.finish()
    }
}
