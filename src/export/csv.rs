//! CSV output, one file per sheet

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::document::{Document, Sheet};
use super::write_atomically;
use crate::error::{CostReportError, CostReportResult};

/// Write one sheet as CSV
///
/// Every row is padded to the sheet's column count so blank rows and label
/// rows survive as rows of empty fields.
pub fn write_sheet_csv<W: Write>(sheet: &Sheet, writer: W) -> CostReportResult<()> {
    let columns = sheet.column_count().max(1);
    let mut wtr = csv::Writer::from_writer(writer);

    for row in sheet.rows() {
        let mut record: Vec<String> = row.iter().map(|cell| cell.display()).collect();
        record.resize(columns, String::new());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Path of the CSV file for a sheet inside `dir`
pub fn sheet_path(dir: &Path, sheet: &Sheet) -> PathBuf {
    dir.join(format!("{}.csv", sheet.name()))
}

/// Write every sheet of a document as `<sheet name>.csv` inside `dir`
pub fn write_csv_dir(document: &Document, dir: &Path) -> CostReportResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        CostReportError::Export(format!("Failed to create directory {}: {}", dir.display(), e))
    })?;

    let mut written = Vec::with_capacity(document.sheets().len());
    for sheet in document.sheets() {
        let mut buffer = Vec::new();
        write_sheet_csv(sheet, &mut buffer)?;

        let path = sheet_path(dir, sheet);
        let temp_path = path.with_extension("csv.tmp");
        write_atomically(&path, &temp_path, |tmp| {
            fs::write(tmp, &buffer)?;
            Ok(())
        })?;

        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "Wrote CSV files");
    Ok(written)
}
