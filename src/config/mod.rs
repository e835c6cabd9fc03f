//! Configuration module for cost-report
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings file persistence

pub mod paths;
pub mod settings;

pub use paths::ReportPaths;
pub use settings::{OutputFormat, Settings};
