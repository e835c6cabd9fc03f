//! Per-dimension amounts for the two compared months
//!
//! The billing API returns one bucket per month. A dimension value can be
//! present in one bucket and absent from the other (a service that only
//! started costing money this month), so lookups default to zero on either
//! side instead of failing.

use indexmap::IndexMap;

/// Past and current amounts for one dimension value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amounts {
    pub past: f64,
    pub current: f64,
}

impl Amounts {
    pub fn new(past: f64, current: f64) -> Self {
        Self { past, current }
    }
}

/// Insertion-ordered mapping from dimension value to [`Amounts`]
///
/// Values keep the order in which they were first seen: everything from the
/// previous month first, then values only present in the current month.
#[derive(Debug, Clone, Default)]
pub struct PeriodAmounts {
    entries: IndexMap<String, Amounts>,
}

impl PeriodAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the previous-month and current-month groups
    pub fn reconcile<P, C>(past: P, current: C) -> Self
    where
        P: IntoIterator<Item = (String, f64)>,
        C: IntoIterator<Item = (String, f64)>,
    {
        let mut amounts = Self::new();
        for (key, amount) in past {
            amounts.add_past(key, amount);
        }
        for (key, amount) in current {
            amounts.add_current(key, amount);
        }
        amounts
    }

    /// Add to the previous-month amount of `key`
    pub fn add_past(&mut self, key: impl Into<String>, amount: f64) {
        self.entries.entry(key.into()).or_default().past += amount;
    }

    /// Add to the current-month amount of `key`
    pub fn add_current(&mut self, key: impl Into<String>, amount: f64) {
        self.entries.entry(key.into()).or_default().current += amount;
    }

    /// Amounts for `key`, zero on both sides when it was never seen
    pub fn get(&self, key: &str) -> Amounts {
        self.entries.get(key).copied().unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amounts)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), *a))
    }
}

impl IntoIterator for PeriodAmounts {
    type Item = (String, Amounts);
    type IntoIter = indexmap::map::IntoIter<String, Amounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_reconcile_fills_missing_sides_with_zero() {
        let amounts = PeriodAmounts::reconcile(
            pairs(&[("A", 10.0), ("B", 5.0)]),
            pairs(&[("B", 7.0), ("C", 3.0)]),
        );

        assert_eq!(amounts.len(), 3);
        assert_eq!(amounts.get("A"), Amounts::new(10.0, 0.0));
        assert_eq!(amounts.get("B"), Amounts::new(5.0, 7.0));
        assert_eq!(amounts.get("C"), Amounts::new(0.0, 3.0));
    }

    #[test]
    fn test_order_is_past_first_then_current_only() {
        let amounts = PeriodAmounts::reconcile(
            pairs(&[("B", 1.0), ("A", 1.0)]),
            pairs(&[("C", 1.0), ("A", 2.0), ("D", 1.0)]),
        );

        let keys: Vec<&str> = amounts.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_missing_key_is_zero() {
        let amounts = PeriodAmounts::new();
        assert_eq!(amounts.get("nothing"), Amounts::default());
        assert!(!amounts.contains("nothing"));
        assert!(amounts.is_empty());
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let mut amounts = PeriodAmounts::new();
        amounts.add_past("A", 1.5);
        amounts.add_past("A", 2.5);
        amounts.add_current("A", 1.0);
        assert_eq!(amounts.get("A"), Amounts::new(4.0, 1.0));
        assert_eq!(amounts.len(), 1);
    }
}
