//! Billing collaborators
//!
//! The report needs two things from the outside world: cost totals grouped by
//! a dimension for a time range, and the list of member accounts. Both are
//! traits so the report can run against AWS or against in-memory data.
//!
//! Both APIs paginate. Implementations only fetch single pages; the provided
//! methods on the traits walk every page.

pub mod aws;
pub mod memory;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::CostReportResult;
use crate::models::{Account, CostMetric, Dimension, DimensionFilter, ReportWindow};

pub use aws::{AwsBilling, AwsBillingConfig};
pub use memory::{CostRecord, InMemoryBilling};

/// A cost query covering both months of a window
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub window: ReportWindow,
    /// `None` asks for one total per month
    pub group_by: Option<Dimension>,
    /// Equality constraints, combined with AND
    pub filters: Vec<DimensionFilter>,
    pub metric: CostMetric,
}

impl CostQuery {
    pub fn new(window: ReportWindow, metric: CostMetric) -> Self {
        Self {
            window,
            group_by: None,
            filters: Vec::new(),
            metric,
        }
    }

    pub fn group_by(mut self, dimension: Dimension) -> Self {
        self.group_by = Some(dimension);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = DimensionFilter>) -> Self {
        self.filters.extend(filters);
        self
    }
}

/// Costs for one month of the queried range
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    /// First day of the month this bucket covers
    pub start: NaiveDate,
    /// Ungrouped total, present when the query had no group-by
    pub total: Option<f64>,
    /// (dimension value, amount) pairs, present when the query had a group-by
    pub groups: Vec<(String, f64)>,
}

impl TimeBucket {
    pub fn total(start: NaiveDate, amount: f64) -> Self {
        Self {
            start,
            total: Some(amount),
            groups: Vec::new(),
        }
    }

    pub fn grouped(start: NaiveDate, groups: Vec<(String, f64)>) -> Self {
        Self {
            start,
            total: None,
            groups,
        }
    }

    /// Fold a later page for the same month into this bucket
    fn absorb(&mut self, other: TimeBucket) {
        if self.total.is_none() {
            self.total = other.total;
        }
        self.groups.extend(other.groups);
    }
}

/// One page of a cost query response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostPage {
    pub buckets: Vec<TimeBucket>,
    pub next_token: Option<String>,
}

/// One page of the account directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub next_token: Option<String>,
}

/// Source of cost totals
pub trait CostSource {
    /// Fetch a single page of results
    fn cost_page(&self, query: &CostQuery, next_token: Option<&str>) -> CostReportResult<CostPage>;

    /// Run a query to completion, merging pages that repeat a month
    fn query(&self, query: &CostQuery) -> CostReportResult<Vec<TimeBucket>> {
        let mut buckets: Vec<TimeBucket> = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self.cost_page(query, token.as_deref())?;
            for bucket in page.buckets {
                match buckets.iter_mut().find(|b| b.start == bucket.start) {
                    Some(existing) => existing.absorb(bucket),
                    None => buckets.push(bucket),
                }
            }

            match page.next_token {
                Some(next) if !next.is_empty() => {
                    debug!(token = %next, "Fetching next cost page");
                    token = Some(next);
                }
                _ => break,
            }
        }

        Ok(buckets)
    }
}

/// Source of the organization's member accounts
pub trait AccountDirectory {
    /// Fetch a single page of accounts
    fn accounts_page(&self, next_token: Option<&str>) -> CostReportResult<AccountPage>;

    /// Fetch every account, following pagination to the end
    fn list_accounts(&self) -> CostReportResult<Vec<Account>> {
        let mut accounts = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self.accounts_page(token.as_deref())?;
            accounts.extend(page.accounts);

            match page.next_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }

        debug!(count = accounts.len(), "Listed organization accounts");
        Ok(accounts)
    }
}
