//! Where cost-report keeps its settings file
//!
//! Lookup order for the config directory:
//!
//! 1. `COST_REPORT_CONFIG_DIR`
//! 2. `$XDG_CONFIG_HOME/cost-report`, else `~/.config/cost-report`
//!    (`%APPDATA%\cost-report` on Windows)
//!
//! Reports themselves are written wherever `--output` points; nothing else is
//! stored here.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::CostReportError;

/// Environment variable that pins the config directory
pub const CONFIG_DIR_ENV: &str = "COST_REPORT_CONFIG_DIR";

const APP_DIR: &str = "cost-report";
const SETTINGS_FILE: &str = "config.json";

/// Resolved config location
#[derive(Debug, Clone)]
pub struct ReportPaths {
    base_dir: PathBuf,
}

impl ReportPaths {
    /// Resolve the config directory from the environment
    pub fn new() -> Result<Self, CostReportError> {
        let base_dir = resolve_config_dir(
            env::var_os(CONFIG_DIR_ENV).map(PathBuf::from),
            platform_config_home(),
        )?;
        Ok(Self { base_dir })
    }

    /// Use a fixed directory, e.g. a temp dir in tests
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `config.json` inside the config directory
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }

    /// Create the config directory if it is missing
    pub fn ensure_directories(&self) -> Result<(), CostReportError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            CostReportError::Io(format!(
                "Failed to create config directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }
}

/// Pick the config directory: an explicit override wins, otherwise the
/// platform config home gets a `cost-report` subdirectory
fn resolve_config_dir(
    override_dir: Option<PathBuf>,
    config_home: Option<PathBuf>,
) -> Result<PathBuf, CostReportError> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }

    config_home.map(|home| home.join(APP_DIR)).ok_or_else(|| {
        CostReportError::Config(format!(
            "Cannot determine a config directory; set {}",
            CONFIG_DIR_ENV
        ))
    })
}

#[cfg(not(windows))]
fn platform_config_home() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

#[cfg(windows)]
fn platform_config_home() -> Option<PathBuf> {
    env::var_os("APPDATA").map(PathBuf::from)
}
