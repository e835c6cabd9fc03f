//! Service layer for cost-report
//!
//! The service layer turns raw billing responses into ranked comparison
//! tables: aggregation over the two months of a window, then diffing and
//! ranking.

pub mod aggregate;
pub mod diff;

pub use aggregate::Aggregator;
pub use diff::{finalize, rows_from_amounts};
