//! Cost aggregation over the two months of a window
//!
//! Every level of the report (account, service, usage type) goes through the
//! same steps: one query for both months, split the response into its past and
//! current buckets, then reconcile the two into [`PeriodAmounts`].

use tracing::{debug, warn};

use crate::billing::{CostQuery, CostSource, TimeBucket};
use crate::error::CostReportResult;
use crate::models::{Amounts, CostMetric, Dimension, DimensionFilter, PeriodAmounts, ReportWindow};

/// Queries a [`CostSource`] and reconciles the results per dimension value
pub struct Aggregator<'a> {
    source: &'a dyn CostSource,
    metric: CostMetric,
}

impl<'a> Aggregator<'a> {
    pub fn new(source: &'a dyn CostSource, metric: CostMetric) -> Self {
        Self { source, metric }
    }

    /// Amounts per value of `group_by`, restricted by `filters`
    pub fn aggregate(
        &self,
        window: &ReportWindow,
        group_by: Dimension,
        filters: &[DimensionFilter],
    ) -> CostReportResult<PeriodAmounts> {
        let query = CostQuery::new(*window, self.metric)
            .group_by(group_by)
            .filters(filters.iter().cloned());

        let (past, current) = split_buckets(window, self.source.query(&query)?);
        let amounts = PeriodAmounts::reconcile(
            past.map(|b| b.groups).unwrap_or_default(),
            current.map(|b| b.groups).unwrap_or_default(),
        );

        debug!(
            group_by = %group_by,
            values = amounts.len(),
            "Aggregated costs"
        );
        Ok(amounts)
    }

    /// Ungrouped totals for both months, restricted by `filters`
    pub fn totals(
        &self,
        window: &ReportWindow,
        filters: &[DimensionFilter],
    ) -> CostReportResult<Amounts> {
        let query = CostQuery::new(*window, self.metric).filters(filters.iter().cloned());

        let (past, current) = split_buckets(window, self.source.query(&query)?);
        Ok(Amounts::new(bucket_total(past), bucket_total(current)))
    }
}

/// Assign response buckets to the previous and current month by start date
fn split_buckets(
    window: &ReportWindow,
    buckets: Vec<TimeBucket>,
) -> (Option<TimeBucket>, Option<TimeBucket>) {
    let mut past = None;
    let mut current = None;

    for bucket in buckets {
        if bucket.start == window.previous.start {
            past = Some(bucket);
        } else if bucket.start == window.current.start {
            current = Some(bucket);
        } else {
            warn!(start = %bucket.start, window = %window, "Ignoring bucket outside the report window");
        }
    }

    (past, current)
}

/// Ungrouped total of a bucket; grouped buckets are summed
fn bucket_total(bucket: Option<TimeBucket>) -> f64 {
    match bucket {
        Some(TimeBucket { total: Some(total), .. }) => total,
        Some(bucket) => bucket.groups.iter().map(|(_, amount)| amount).sum(),
        None => 0.0,
    }
}
