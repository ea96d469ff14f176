//! weatherdash library
//!
//! Exposes the dashboard's modules so the binary and integration tests share
//! one implementation.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod state;
pub mod store;
pub mod ui;
