//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report builder.

pub mod report;
pub mod window;

pub use report::{handle_run_command, RunArgs};
pub use window::{handle_window_command, WindowArgs};
