//! Display formatting for terminal output
//!
//! Renders comparison tables for the terminal. Spreadsheet output lives in
//! [`crate::export`].

pub mod table;

pub use table::{format_amount, format_change, format_cost_table, format_summary_table};
