//! WattMap: upload building electricity usage, get a per-building forecast
//! back from a remote model, and browse it one building at a time.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod session;
pub mod telemetry;
pub mod ui;
