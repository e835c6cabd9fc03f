//! Custom error types for cost-report
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cost-report operations
#[derive(Error, Debug)]
pub enum CostReportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Billing query failures (transport, authorization, malformed amounts)
    #[error("Billing query failed: {0}")]
    Billing(String),

    /// Account directory failures
    #[error("Account directory error: {0}")]
    Directory(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl CostReportError {
    /// Create a billing error for an amount that could not be parsed
    pub fn invalid_amount(dimension_value: &str, raw: &str) -> Self {
        Self::Billing(format!(
            "Invalid amount '{}' for '{}'",
            raw, dimension_value
        ))
    }
}

impl From<std::io::Error> for CostReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CostReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for CostReportError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CostReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for cost-report operations
pub type CostReportResult<T> = Result<T, CostReportError>;
