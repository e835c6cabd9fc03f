//! Excel workbook output

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use super::document::{Cell, Document};
use super::write_atomically;
use crate::error::{CostReportError, CostReportResult};

/// Excel number format for amounts and percentages
const NUMBER_FORMAT: &str = "0.00";

/// Render a document into an in-memory workbook
pub fn build_workbook(document: &Document) -> CostReportResult<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let number = Format::new().set_num_format(NUMBER_FORMAT);

    for sheet in document.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (r, cells) in sheet.rows().iter().enumerate() {
            let row = u32::try_from(r)
                .map_err(|_| CostReportError::Export(format!("Too many rows in {}", sheet.name())))?;
            let bold = sheet.is_header(r);

            for (c, cell) in cells.iter().enumerate() {
                let col = u16::try_from(c).map_err(|_| {
                    CostReportError::Export(format!("Too many columns in {}", sheet.name()))
                })?;

                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) if bold => {
                        worksheet.write_string_with_format(row, col, text, &header)?;
                    }
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number_with_format(row, col, *value, &number)?;
                    }
                }
            }
        }

        for (c, width) in sheet.column_widths().iter().enumerate() {
            let col = u16::try_from(c).map_err(|_| {
                CostReportError::Export(format!("Too many columns in {}", sheet.name()))
            })?;
            worksheet.set_column_width(col, *width as f64)?;
        }
    }

    Ok(workbook)
}

/// Write a document as an `.xlsx` file
///
/// The workbook goes to a temporary file next to `path` and is renamed into
/// place, so a failed write never leaves a truncated file behind.
pub fn write_xlsx(document: &Document, path: &Path) -> CostReportResult<()> {
    let mut workbook = build_workbook(document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CostReportError::Export(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = path.with_extension("xlsx.tmp");
    write_atomically(path, &temp_path, |tmp| {
        workbook.save(tmp)?;
        Ok(())
    })?;

    info!(path = %path.display(), sheets = document.sheets().len(), "Wrote workbook");
    Ok(())
}
