//! Core data models for cost-report
//!
//! This module contains the data structures of the cost comparison domain:
//! the reporting window, accounts, dimensions, per-month amounts and the
//! ranked comparison tables built from them.

pub mod account;
pub mod amounts;
pub mod cost;
pub mod dimension;
pub mod window;

pub use account::Account;
pub use amounts::{Amounts, PeriodAmounts};
pub use cost::{CostRow, CostTable};
pub use dimension::{CostMetric, Dimension, DimensionFilter};
pub use window::{MonthPeriod, ReportWindow, DATE_FORMAT};
