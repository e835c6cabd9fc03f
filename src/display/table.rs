//! Terminal tables for cost comparisons

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{CostRow, CostTable};

/// Format an amount with two decimals
///
/// Values that round to zero print as `0.00`, never `-0.00`.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", without_negative_zero(amount))
}

/// Format a change with an explicit sign
pub fn format_change(amount: f64) -> String {
    format!("{:+.2}", without_negative_zero(amount))
}

fn without_negative_zero(amount: f64) -> f64 {
    if (amount * 100.0).round() == 0.0 {
        0.0
    } else {
        amount
    }
}

#[derive(Tabled)]
struct SummaryLine {
    #[tabled(rename = "Account ID")]
    id: String,
    #[tabled(rename = "Account Name")]
    name: String,
    #[tabled(rename = "Past Month")]
    past: String,
    #[tabled(rename = "Current Month")]
    current: String,
    #[tabled(rename = "Absolute Diff")]
    absolute: String,
    #[tabled(rename = "Relative Diff (%)")]
    relative: String,
}

impl From<&CostRow> for SummaryLine {
    fn from(row: &CostRow) -> Self {
        Self {
            id: row.dimension_value.clone(),
            name: row.label.clone(),
            past: format_amount(row.past_amount),
            current: format_amount(row.current_amount),
            absolute: format_change(row.absolute_diff),
            relative: format_change(row.relative_diff_pct),
        }
    }
}

/// Render the per-account summary
pub fn format_summary_table(table: &CostTable) -> String {
    if table.is_empty() {
        return "No accounts found.".to_string();
    }

    let lines: Vec<SummaryLine> = table.iter().map(SummaryLine::from).collect();
    Table::new(lines)
        .with(Style::modern())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string()
}

/// Render a service or usage-type table
pub fn format_cost_table(table: &CostTable) -> String {
    if table.is_empty() {
        return "No costs found.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record([
        table.dimension().header(),
        "Sum",
        "Past Month",
        "Current Month",
        "Absolute Diff",
        "Relative Diff (%)",
    ]);
    for row in table {
        builder.push_record([
            row.dimension_value.clone(),
            format_amount(row.sum()),
            format_amount(row.past_amount),
            format_amount(row.current_amount),
            format_change(row.absolute_diff),
            format_change(row.relative_diff_pct),
        ]);
    }

    builder
        .build()
        .with(Style::modern())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}
