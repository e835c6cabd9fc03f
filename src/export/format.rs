//! Column sizing
//!
//! Runs once over the finished document, before it is written.

use super::document::{Document, Sheet};

/// Characters added to the widest cell of each column
pub const WIDTH_PADDING: usize = 2;

/// Size every column of every sheet to its widest cell plus padding
pub fn autosize(document: &mut Document) {
    for sheet in document.sheets_mut() {
        let widths = column_widths(sheet);
        sheet.set_column_widths(widths);
    }
}

/// Width of each column: the longest displayed cell (headers and labels
/// included) plus [`WIDTH_PADDING`]
pub fn column_widths(sheet: &Sheet) -> Vec<usize> {
    let mut widths = vec![0; sheet.column_count()];

    for row in sheet.rows() {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.display_len());
        }
    }

    widths.into_iter().map(|w| w + WIDTH_PADDING).collect()
}
