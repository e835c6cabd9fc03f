//! Reports module for cost-report
//!
//! Provides the month-over-month cost comparison report.

pub mod cost_comparison;

pub use cost_comparison::{
    AccountSection, CostComparisonReport, ReportBuilder, ReportOptions, ServiceUsage,
    DEFAULT_TOP_N,
};
