//! CLI module for afinar
//!
//! Command handlers plus the [`LogLevel`]/[`log`] output model shared with
//! the library's progress callbacks.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::{log, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
