//! cost-report - month-over-month cloud cost comparison
//!
//! This library compares an organization's amortized costs between a
//! reference month and the month before it, per account, per service and
//! per usage type, and writes the result as a spreadsheet.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (report window, amounts, cost tables)
//! - `billing`: Cost and account collaborators (AWS and in-memory)
//! - `services`: Aggregation and ranking
//! - `reports`: The cost comparison report
//! - `export`: Spreadsheet layout, column sizing and writers
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use cost_report::billing::{AwsBilling, AwsBillingConfig};
//! use cost_report::reports::{ReportBuilder, ReportOptions};
//!
//! let billing = AwsBilling::connect(&AwsBillingConfig::default())?;
//! let report = ReportBuilder::new(&billing, &billing, ReportOptions::default()).build(6, 2025)?;
//! ```

pub mod billing;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;

pub use error::CostReportError;
