//! In-memory billing data
//!
//! Answers cost queries and account listings from a fixed set of records.
//! Used by the test suite and for dry runs from a JSON fixture.

use std::cell::RefCell;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AccountDirectory, AccountPage, CostPage, CostQuery, CostSource, TimeBucket};
use crate::error::{CostReportError, CostReportResult};
use crate::models::{Account, Dimension, DimensionFilter, MonthPeriod};

/// One line item of billing data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Any day inside the month the cost belongs to
    pub date: NaiveDate,
    pub account_id: String,
    pub service: String,
    pub usage_type: String,
    pub amount: f64,
}

impl CostRecord {
    pub fn new(
        date: NaiveDate,
        account_id: impl Into<String>,
        service: impl Into<String>,
        usage_type: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date,
            account_id: account_id.into(),
            service: service.into(),
            usage_type: usage_type.into(),
            amount,
        }
    }

    fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::LinkedAccount => &self.account_id,
            Dimension::Service => &self.service,
            Dimension::UsageType => &self.usage_type,
        }
    }

    fn matches(&self, filter: &DimensionFilter) -> bool {
        self.value(filter.dimension) == filter.value
    }
}

/// Fixture file layout for [`InMemoryBilling::from_json_file`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingFixture {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub records: Vec<CostRecord>,
}

/// Billing collaborator backed by in-memory records
#[derive(Debug, Default)]
pub struct InMemoryBilling {
    accounts: Vec<Account>,
    records: Vec<CostRecord>,
    page_size: Option<usize>,
    queries: RefCell<Vec<CostQuery>>,
}

impl InMemoryBilling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.accounts.push(Account::new(id, name));
        self
    }

    pub fn with_record(mut self, record: CostRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Split responses into pages of at most `size` entries
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Load accounts and records from a JSON fixture
    pub fn from_json_file(path: &Path) -> CostReportResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CostReportError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let fixture: BillingFixture = serde_json::from_str(&contents)?;

        Ok(Self {
            accounts: fixture.accounts,
            records: fixture.records,
            ..Self::default()
        })
    }

    /// Every query issued so far, one per request (not per page)
    pub fn queries(&self) -> Vec<CostQuery> {
        self.queries.borrow().clone()
    }

    fn bucket(&self, query: &CostQuery, month: &MonthPeriod) -> TimeBucket {
        let records = self.records.iter().filter(|r| {
            month.contains(r.date) && query.filters.iter().all(|f| r.matches(f))
        });

        match query.group_by {
            None => TimeBucket::total(month.start, records.map(|r| r.amount).sum()),
            Some(dimension) => {
                let mut groups: Vec<(String, f64)> = Vec::new();
                for record in records {
                    let key = record.value(dimension);
                    match groups.iter_mut().find(|(k, _)| k == key) {
                        Some((_, amount)) => *amount += record.amount,
                        None => groups.push((key.to_string(), record.amount)),
                    }
                }
                TimeBucket::grouped(month.start, groups)
            }
        }
    }
}

/// Parse a page token produced by this module
fn page_offset(next_token: Option<&str>) -> CostReportResult<usize> {
    next_token
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| CostReportError::Validation(format!("Invalid page token: {}", t)))
        })
        .transpose()
        .map(|offset| offset.unwrap_or(0))
}

impl CostSource for InMemoryBilling {
    fn cost_page(&self, query: &CostQuery, next_token: Option<&str>) -> CostReportResult<CostPage> {
        let offset = page_offset(next_token)?;
        if offset == 0 {
            self.queries.borrow_mut().push(query.clone());
        }

        let mut buckets = vec![
            self.bucket(query, &query.window.previous),
            self.bucket(query, &query.window.current),
        ];

        let size = match (self.page_size, query.group_by) {
            (Some(size), Some(_)) => size,
            _ => return Ok(CostPage { buckets, next_token: None }),
        };

        // Page through groups in step across both buckets
        let longest = buckets.iter().map(|b| b.groups.len()).max().unwrap_or(0);
        for bucket in &mut buckets {
            bucket.groups = bucket.groups.iter().skip(offset).take(size).cloned().collect();
        }
        let next_token = (offset + size < longest).then(|| (offset + size).to_string());

        Ok(CostPage { buckets, next_token })
    }
}

impl AccountDirectory for InMemoryBilling {
    fn accounts_page(&self, next_token: Option<&str>) -> CostReportResult<AccountPage> {
        let offset = page_offset(next_token)?;
        let size = self.page_size.unwrap_or(self.accounts.len().max(1));

        let accounts: Vec<Account> = self.accounts.iter().skip(offset).take(size).cloned().collect();
        let next_token = (offset + size < self.accounts.len()).then(|| (offset + size).to_string());

        Ok(AccountPage { accounts, next_token })
    }
}
