//! Cost comparison rows and tables

use serde::{Deserialize, Serialize};

use super::Dimension;

/// One comparison record between the previous and the current month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    /// Account id, service name or usage type
    pub dimension_value: String,
    /// Secondary display value (the account name on account rows)
    pub label: String,
    pub past_amount: f64,
    pub current_amount: f64,
    /// `current_amount - past_amount`
    pub absolute_diff: f64,
    /// `absolute_diff / past_amount * 100`, or 0 when there was no past cost
    pub relative_diff_pct: f64,
    /// Left empty for manual annotation
    pub details: Option<String>,
}

impl CostRow {
    /// Create a row and compute its deltas
    pub fn new(
        dimension_value: impl Into<String>,
        label: impl Into<String>,
        past_amount: f64,
        current_amount: f64,
    ) -> Self {
        let absolute_diff = current_amount - past_amount;
        let relative_diff_pct = if past_amount == 0.0 {
            0.0
        } else {
            absolute_diff / past_amount * 100.0
        };

        Self {
            dimension_value: dimension_value.into(),
            label: label.into(),
            past_amount,
            current_amount,
            absolute_diff,
            relative_diff_pct,
            details: None,
        }
    }

    /// Combined cost of both months
    pub fn sum(&self) -> f64 {
        self.past_amount + self.current_amount
    }

    /// Magnitude used for ranking
    pub fn magnitude(&self) -> f64 {
        self.absolute_diff.abs()
    }
}

/// Rows of one dimension, ranked by the size of their change
///
/// Only [`crate::services::diff::finalize`] builds tables, so a table is
/// always sorted and never changes once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTable {
    dimension: Dimension,
    rows: Vec<CostRow>,
}

impl CostTable {
    pub(crate) fn from_sorted(dimension: Dimension, rows: Vec<CostRow>) -> Self {
        Self { dimension, rows }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn rows(&self) -> &[CostRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CostRow> {
        self.rows.iter()
    }

    pub fn total_past(&self) -> f64 {
        self.rows.iter().map(|r| r.past_amount).sum()
    }

    pub fn total_current(&self) -> f64 {
        self.rows.iter().map(|r| r.current_amount).sum()
    }
}

impl<'a> IntoIterator for &'a CostTable {
    type Item = &'a CostRow;
    type IntoIter = std::slice::Iter<'a, CostRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_deltas() {
        let row = CostRow::new("123", "prod", 100.0, 150.0);
        assert_eq!(row.absolute_diff, 50.0);
        assert_eq!(row.relative_diff_pct, 50.0);
        assert_eq!(row.sum(), 250.0);
        assert!(row.details.is_none());
    }

    #[test]
    fn test_zero_past_gives_zero_percent() {
        for current in [0.0, 3.0, -2.0, 1e9] {
            let row = CostRow::new("svc", "", 0.0, current);
            assert_eq!(row.relative_diff_pct, 0.0);
            assert_eq!(row.absolute_diff, current);
        }
    }

    #[test]
    fn test_diff_is_not_rounded() {
        let row = CostRow::new("svc", "", 0.1, 0.3);
        assert_eq!(row.absolute_diff, 0.3 - 0.1);
    }

    #[test]
    fn test_decrease_is_negative() {
        let row = CostRow::new("svc", "", 10.0, 0.0);
        assert_eq!(row.absolute_diff, -10.0);
        assert_eq!(row.relative_diff_pct, -100.0);
        assert_eq!(row.magnitude(), 10.0);
    }

    #[test]
    fn test_table_totals() {
        let table = CostTable::from_sorted(
            Dimension::Service,
            vec![
                CostRow::new("EC2", "", 10.0, 20.0),
                CostRow::new("S3", "", 5.0, 4.0),
            ],
        );
        assert_eq!(table.total_past(), 15.0);
        assert_eq!(table.total_current(), 24.0);
        assert_eq!(table.rows()[1].dimension_value, "S3");
    }
}
