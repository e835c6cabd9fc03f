//! Ranking of comparison rows
//!
//! Rows are ordered by the size of their change, largest first, regardless of
//! direction. Rows with the same magnitude keep their input order.

use std::cmp::Ordering;

use crate::models::{CostRow, CostTable, Dimension, PeriodAmounts};

/// Turn reconciled amounts into unranked rows
pub fn rows_from_amounts(amounts: PeriodAmounts) -> Vec<CostRow> {
    amounts
        .into_iter()
        .map(|(value, a)| CostRow::new(value, "", a.past, a.current))
        .collect()
}

/// Sort rows by descending `|absolute_diff|` and keep at most `top_n`
pub fn finalize(dimension: Dimension, mut rows: Vec<CostRow>, top_n: Option<usize>) -> CostTable {
    rows.sort_by(by_magnitude_desc);
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    CostTable::from_sorted(dimension, rows)
}

/// Descending magnitude; NaN sorts after every number
fn by_magnitude_desc(a: &CostRow, b: &CostRow) -> Ordering {
    rank_key(b).total_cmp(&rank_key(a))
}

fn rank_key(row: &CostRow) -> f64 {
    let magnitude = row.magnitude();
    if magnitude.is_nan() {
        f64::NEG_INFINITY
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: &str, past: f64, current: f64) -> CostRow {
        CostRow::new(value, "", past, current)
    }

    fn values(table: &CostTable) -> Vec<&str> {
        table.iter().map(|r| r.dimension_value.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_magnitude_regardless_of_sign() {
        let table = finalize(
            Dimension::Service,
            vec![row("small", 1.0, 2.0), row("drop", 50.0, 10.0), row("rise", 0.0, 20.0)],
            None,
        );
        assert_eq!(values(&table), vec!["drop", "rise", "small"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let table = finalize(
            Dimension::Service,
            vec![
                row("a", 0.0, 5.0),
                row("b", 5.0, 0.0),
                row("big", 0.0, 9.0),
                row("c", 10.0, 15.0),
            ],
            None,
        );
        assert_eq!(values(&table), vec!["big", "a", "b", "c"]);
    }

    #[test]
    fn test_truncation_is_prefix_of_full_order() {
        let rows: Vec<CostRow> = (0..25)
            .map(|i| row(&format!("r{}", i), 100.0, 100.0 + ((i * 7) % 13) as f64))
            .collect();

        let full = finalize(Dimension::UsageType, rows.clone(), None);
        let top = finalize(Dimension::UsageType, rows, Some(10));

        assert_eq!(top.len(), 10);
        assert_eq!(top.rows(), &full.rows()[..10]);
        for pair in full.rows().windows(2) {
            assert!(pair[0].magnitude() >= pair[1].magnitude());
        }
    }

    #[test]
    fn test_top_n_larger_than_rows() {
        let table = finalize(Dimension::Service, vec![row("a", 1.0, 2.0)], Some(10));
        assert_eq!(table.len(), 1);

        let empty = finalize(Dimension::Service, vec![row("a", 1.0, 2.0)], Some(0));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_nan_sorts_last() {
        let table = finalize(
            Dimension::Service,
            vec![row("nan", f64::NAN, 1.0), row("one", 0.0, 1.0), row("zero", 1.0, 1.0)],
            None,
        );
        assert_eq!(values(&table), vec!["one", "zero", "nan"]);
    }

    #[test]
    fn test_rows_from_amounts() {
        let amounts = PeriodAmounts::reconcile(
            vec![("A".to_string(), 10.0), ("B".to_string(), 5.0)],
            vec![("B".to_string(), 7.0), ("C".to_string(), 3.0)],
        );
        let table = finalize(Dimension::Service, rows_from_amounts(amounts), None);

        let diffs: Vec<(&str, f64)> = table
            .iter()
            .map(|r| (r.dimension_value.as_str(), r.absolute_diff))
            .collect();
        assert_eq!(diffs, vec![("A", -10.0), ("C", 3.0), ("B", 2.0)]);
        assert!(table.iter().all(|r| r.details.is_none()));
    }
}
