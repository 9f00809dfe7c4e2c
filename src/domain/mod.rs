//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod position;
pub mod simulator;
pub mod backtest;
pub mod universe;
pub mod config_validation;
pub mod error;
