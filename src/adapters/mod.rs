//! Concrete adapter implementations for ports.

pub mod console_report;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod tracing_events;
pub mod trade_log_csv;
