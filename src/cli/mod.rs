//! CLI command handlers

pub mod commands;

pub use commands::{format_money, generate, inspect, tracking, years};
