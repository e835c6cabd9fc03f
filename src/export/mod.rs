//! Spreadsheet export for cost comparison reports
//!
//! A report is first laid out as an in-memory [`Document`], then sized by
//! [`autosize`], then written exactly once:
//! - XLSX: one workbook, summary sheet first, one sheet per account
//! - CSV: a directory with one file per sheet

pub mod csv;
pub mod document;
pub mod format;
pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

pub use self::csv::write_csv_dir;
pub use document::{sanitize_sheet_name, Cell, Document, Sheet, SUMMARY_SHEET};
pub use format::{autosize, column_widths, WIDTH_PADDING};
pub use xlsx::{build_workbook, write_xlsx};

use crate::config::OutputFormat;
use crate::error::{CostReportError, CostReportResult};
use crate::reports::CostComparisonReport;

/// Where a report in `format` ends up for a requested output path
///
/// CSV output is a directory; a trailing `.xlsx` or `.csv` extension on the
/// requested path is dropped so the default `output.xlsx` becomes `output/`.
pub fn output_location(format: OutputFormat, path: &Path) -> PathBuf {
    match format {
        OutputFormat::Xlsx => path.to_path_buf(),
        OutputFormat::Csv => {
            let is_file_like = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_file_like {
                path.with_extension("")
            } else {
                path.to_path_buf()
            }
        }
    }
}

/// Write `path` through a temporary sibling file
///
/// `write` fills the temporary file, which is then renamed over `path`. On any
/// failure the temporary file is removed and `path` is left untouched.
pub(crate) fn write_atomically<F>(path: &Path, temp_path: &Path, write: F) -> CostReportResult<()>
where
    F: FnOnce(&Path) -> CostReportResult<()>,
{
    if let Err(e) = write(temp_path) {
        let _ = fs::remove_file(temp_path);
        return Err(e);
    }

    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        CostReportError::Export(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// Lay out, size and write a report; returns the path written
pub fn write_report(
    report: &CostComparisonReport,
    format: OutputFormat,
    path: &Path,
) -> CostReportResult<PathBuf> {
    let mut document = Document::from_report(report);
    autosize(&mut document);

    let location = output_location(format, path);
    match format {
        OutputFormat::Xlsx => write_xlsx(&document, &location)?,
        OutputFormat::Csv => {
            write_csv_dir(&document, &location)?;
        }
    }

    Ok(location)
}
