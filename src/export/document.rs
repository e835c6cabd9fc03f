//! In-memory spreadsheet document
//!
//! A report is laid out as a grid of cells per sheet before anything touches
//! the filesystem. Column sizing and the actual file writers all work from
//! this one model.
//!
//! Layout of an account sheet:
//!
//! ```text
//! service table (header + rows)
//! <blank>
//! service name
//! usage-type table (header + rows)
//! <blank>
//! service name
//! ...
//! ```

use std::collections::HashSet;

use crate::display::format_amount;
use crate::models::{CostRow, CostTable};
use crate::reports::{AccountSection, CostComparisonReport};

/// Name of the per-account summary sheet
pub const SUMMARY_SHEET: &str = "Accounts";

/// Longest sheet name a workbook accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

pub const SUMMARY_HEADERS: [&str; 7] = [
    "Account ID",
    "Account Name",
    "Past Month",
    "Current Month",
    "Absolute Diff",
    "Relative Diff (%)",
    "Details",
];

const TABLE_HEADERS: [&str; 6] = [
    "Sum",
    "Past Month",
    "Current Month",
    "Absolute Diff",
    "Relative Diff (%)",
    "Details",
];

static EMPTY_CELL: Cell = Cell::Empty;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The string shown for this cell; numbers always carry two decimals
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(n) => format_amount(*n),
        }
    }

    /// Displayed length in characters
    pub fn display_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Text(text) => text.chars().count(),
            Self::Number(_) => self.display().chars().count(),
        }
    }
}

impl From<Option<&String>> for Cell {
    fn from(value: Option<&String>) -> Self {
        match value {
            Some(text) => Self::Text(text.clone()),
            None => Self::Empty,
        }
    }
}

/// One worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
    header_rows: HashSet<usize>,
    column_widths: Vec<usize>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            header_rows: HashSet::new(),
            column_widths: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at (row, col); anything outside the written area is empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Widest row in the sheet
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_header(&self, row: usize) -> bool {
        self.header_rows.contains(&row)
    }

    /// Column widths in characters, set by [`super::format::autosize`]
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }

    pub fn set_column_widths(&mut self, widths: Vec<usize>) {
        self.column_widths = widths;
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) -> usize {
        self.rows.push(cells);
        self.rows.len() - 1
    }

    pub fn push_header<I, S>(&mut self, titles: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = self.push_row(titles.into_iter().map(|t| Cell::Text(t.into())).collect());
        self.header_rows.insert(row);
        row
    }

    pub fn push_blank(&mut self) -> usize {
        self.push_row(Vec::new())
    }

    /// Header plus one row per entry of a service or usage-type table
    fn push_cost_table(&mut self, table: &CostTable) {
        self.push_header(std::iter::once(table.dimension().header()).chain(TABLE_HEADERS));
        for row in table {
            self.push_row(table_row(row));
        }
    }
}

/// A workbook made of uniquely named sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sheets: Vec<Sheet>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out a report: the summary sheet, then one sheet per account
    pub fn from_report(report: &CostComparisonReport) -> Self {
        let mut document = Self::new();

        let summary = document.add_sheet(SUMMARY_SHEET, SUMMARY_SHEET);
        summary.push_header(SUMMARY_HEADERS);
        for row in &report.summary {
            summary.push_row(summary_row(row));
        }

        for section in &report.sections {
            document.add_account_sheet(section);
        }

        document
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut [Sheet] {
        &mut self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Add a sheet, sanitizing and de-duplicating its name
    pub fn add_sheet(&mut self, name: &str, fallback: &str) -> &mut Sheet {
        let name = self.unique_name(&sanitize_sheet_name(name, fallback));
        self.sheets.push(Sheet::new(name));
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    fn add_account_sheet(&mut self, section: &AccountSection) {
        let sheet = self.add_sheet(&section.account.name, &section.account.id);

        sheet.push_cost_table(&section.services);
        sheet.push_blank();

        for usage in &section.usage {
            sheet.push_row(vec![Cell::text(&usage.service)]);
            sheet.push_cost_table(&usage.usage);
            sheet.push_blank();
        }
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |candidate: &str| {
            self.sheets
                .iter()
                .any(|s| s.name.to_lowercase() == candidate.to_lowercase())
        };

        if !taken(base) {
            return base.to_string();
        }

        (2..)
            .map(|n| {
                let suffix = format!(" ({})", n);
                let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
                let stem: String = base.chars().take(keep).collect();
                format!("{}{}", stem, suffix)
            })
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Make a name acceptable as a worksheet name
///
/// Replaces forbidden characters, trims leading/trailing apostrophes and
/// whitespace, and truncates to [`MAX_SHEET_NAME_LEN`] characters. Falls back
/// to `fallback` (sanitized the same way) when nothing usable is left.
pub fn sanitize_sheet_name(name: &str, fallback: &str) -> String {
    fn clean(name: &str) -> String {
        let replaced: String = name
            .chars()
            .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
            .collect();
        replaced
            .trim()
            .trim_matches('\'')
            .trim()
            .chars()
            .take(MAX_SHEET_NAME_LEN)
            .collect()
    }

    let cleaned = clean(name);
    if !cleaned.is_empty() {
        return cleaned;
    }

    let cleaned = clean(fallback);
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn summary_row(row: &CostRow) -> Vec<Cell> {
    vec![
        Cell::text(&row.dimension_value),
        Cell::text(&row.label),
        Cell::Number(row.past_amount),
        Cell::Number(row.current_amount),
        Cell::Number(row.absolute_diff),
        Cell::Number(row.relative_diff_pct),
        Cell::from(row.details.as_ref()),
    ]
}

fn table_row(row: &CostRow) -> Vec<Cell> {
    vec![
        Cell::text(&row.dimension_value),
        Cell::Number(row.sum()),
        Cell::Number(row.past_amount),
        Cell::Number(row.current_amount),
        Cell::Number(row.absolute_diff),
        Cell::Number(row.relative_diff_pct),
        Cell::from(row.details.as_ref()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{CostRecord, InMemoryBilling};
    use crate::reports::{ReportBuilder, ReportOptions};
    use chrono::NaiveDate;

    fn report() -> CostComparisonReport {
        let day = |m| NaiveDate::from_ymd_opt(2025, m, 15).unwrap();
        let billing = InMemoryBilling::new()
            .with_account("111", "prod")
            .with_record(CostRecord::new(day(5), "111", "EC2", "BoxUsage", 10.0))
            .with_record(CostRecord::new(day(6), "111", "EC2", "BoxUsage", 12.0))
            .with_record(CostRecord::new(day(6), "111", "EC2", "EBS:VolumeUsage", 3.0))
            .with_record(CostRecord::new(day(6), "111", "S3", "Requests", 1.0));

        ReportBuilder::new(&billing, &billing, ReportOptions::default())
            .build(6, 2025)
            .unwrap()
    }

    #[test]
    fn test_summary_sheet() {
        let document = Document::from_report(&report());
        let summary = &document.sheets()[0];

        assert_eq!(summary.name(), "Accounts");
        assert!(summary.is_header(0));
        assert_eq!(summary.cell(0, 6), &Cell::text("Details"));
        assert_eq!(summary.cell(1, 0), &Cell::text("111"));
        assert_eq!(summary.cell(1, 1), &Cell::text("prod"));
        assert_eq!(summary.cell(1, 2), &Cell::Number(10.0));
        assert_eq!(summary.cell(1, 3), &Cell::Number(16.0));
        assert_eq!(summary.cell(1, 6), &Cell::Empty);
    }

    #[test]
    fn test_account_sheet_offsets() {
        let document = Document::from_report(&report());
        let sheet = document.sheet("prod").unwrap();

        // Service table: header at 0, EC2 and S3 at 1-2, blank at 3
        assert_eq!(sheet.cell(0, 0), &Cell::text("Service"));
        assert_eq!(sheet.cell(0, 1), &Cell::text("Sum"));
        assert_eq!(sheet.cell(1, 0), &Cell::text("EC2"));
        assert_eq!(sheet.cell(1, 1), &Cell::Number(25.0));
        assert_eq!(sheet.cell(2, 0), &Cell::text("S3"));
        assert!(sheet.rows()[3].is_empty());

        // EC2 block: label, header, two usage rows, blank
        assert_eq!(sheet.rows()[4], vec![Cell::text("EC2")]);
        assert!(!sheet.is_header(4));
        assert!(sheet.is_header(5));
        assert_eq!(sheet.cell(5, 0), &Cell::text("Usage Type"));
        assert_eq!(sheet.cell(6, 0), &Cell::text("EBS:VolumeUsage"));
        assert_eq!(sheet.cell(7, 0), &Cell::text("BoxUsage"));
        assert!(sheet.rows()[8].is_empty());

        // S3 block
        assert_eq!(sheet.rows()[9], vec![Cell::text("S3")]);
        assert_eq!(sheet.cell(11, 0), &Cell::text("Requests"));
        assert!(sheet.rows()[12].is_empty());
        assert_eq!(sheet.rows().len(), 13);
    }

    #[test]
    fn test_number_display_has_two_decimals() {
        assert_eq!(Cell::Number(150.0).display(), "150.00");
        assert_eq!(Cell::Number(-0.126).display(), "-0.13");
        assert_eq!(Cell::Number(1234.5).display_len(), 7);
        assert_eq!(Cell::Empty.display_len(), 0);
    }

    #[test]
    fn test_rounded_zero_has_no_sign() {
        let cell = Cell::Number(-0.0001);
        assert_eq!(cell.display(), "0.00");
        assert_eq!(cell.display_len(), 4);
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("prod/eu:west", "1"), "prod_eu_west");
        assert_eq!(sanitize_sheet_name("'quoted'", "1"), "quoted");
        assert_eq!(sanitize_sheet_name("  ", "123"), "123");
        assert_eq!(sanitize_sheet_name("", ""), "Sheet");
        assert_eq!(
            sanitize_sheet_name("an account name that is far too long for excel", "1")
                .chars()
                .count(),
            MAX_SHEET_NAME_LEN
        );
    }

    #[test]
    fn test_duplicate_sheet_names_get_suffix() {
        let mut document = Document::new();
        document.add_sheet(SUMMARY_SHEET, SUMMARY_SHEET);
        document.add_sheet("accounts", "1");
        document.add_sheet("Accounts", "2");
        let long = "x".repeat(40);
        document.add_sheet(&long, "3");
        document.add_sheet(&long, "4");

        let names: Vec<&str> = document.sheets().iter().map(|s| s.name()).collect();
        assert_eq!(names[1], "accounts (2)");
        assert_eq!(names[2], "Accounts (3)");
        assert_eq!(names[4].chars().count(), MAX_SHEET_NAME_LEN);
        assert!(names[4].ends_with(" (2)"));
    }
}
