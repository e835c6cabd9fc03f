//! User settings for cost-report
//!
//! Holds the reference month, output location and billing options. Every
//! field can be overridden from the command line.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::paths::ReportPaths;
use crate::error::CostReportError;
use crate::models::CostMetric;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single workbook with one sheet per account (default)
    #[default]
    Xlsx,
    /// Directory with one CSV file per sheet
    Csv,
}

/// User settings for cost-report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Reference month (1-12); defaults to last month when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    /// Reference year; defaults to last month's year when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Output path (file for xlsx, directory for csv)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Rows kept in service and usage-type tables
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Cost metric requested from the billing API
    #[serde(default)]
    pub metric: CostMetric,

    /// Named AWS profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// AWS region override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_output() -> PathBuf {
    PathBuf::from("output.xlsx")
}

fn default_top_n() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            month: None,
            year: None,
            output: default_output(),
            format: OutputFormat::default(),
            top_n: default_top_n(),
            metric: CostMetric::default(),
            profile: None,
            region: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_default(paths: &ReportPaths) -> Result<Self, CostReportError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CostReportError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CostReportError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReportPaths) -> Result<(), CostReportError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CostReportError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CostReportError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Resolve the reference (month, year), falling back to the month before `today`
    pub fn reference_month(&self, today: NaiveDate) -> (u32, i32) {
        let (default_month, default_year) = if today.month() == 1 {
            (12, today.year() - 1)
        } else {
            (today.month() - 1, today.year())
        };

        (
            self.month.unwrap_or(default_month),
            self.year.unwrap_or(default_year),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.top_n, 10);
        assert_eq!(settings.format, OutputFormat::Xlsx);
        assert_eq!(settings.metric, CostMetric::AmortizedCost);
        assert_eq!(settings.output, PathBuf::from("output.xlsx"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.month = Some(6);
        settings.year = Some(2025);
        settings.format = OutputFormat::Csv;
        settings.metric = CostMetric::UnblendedCost;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.month, Some(6));
        assert_eq!(loaded.year, Some(2025));
        assert_eq!(loaded.format, OutputFormat::Csv);
        assert_eq!(loaded.metric, CostMetric::UnblendedCost);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"profile": "root"}"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.profile.as_deref(), Some("root"));
        assert_eq!(loaded.top_n, 10);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_default(&paths).unwrap_err();
        assert!(matches!(err, CostReportError::Config(_)));
    }

    #[test]
    fn test_reference_month_defaults_to_previous_month() {
        let settings = Settings::default();
        let today = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        assert_eq!(settings.reference_month(today), (6, 2025));

        let january = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(settings.reference_month(january), (12, 2024));
    }

    #[test]
    fn test_reference_month_prefers_configured_values() {
        let settings = Settings {
            month: Some(3),
            year: Some(2024),
            ..Settings::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        assert_eq!(settings.reference_month(today), (3, 2024));
    }
}
