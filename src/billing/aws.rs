//! AWS implementation of the billing collaborators
//!
//! Costs come from Cost Explorer `GetCostAndUsage`, accounts from
//! Organizations `ListAccounts`. The SDK is async; this client owns a
//! current-thread runtime and blocks on each call so the report stays a
//! plain sequential loop with one request in flight.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{
    DateInterval, Dimension as CeDimension, DimensionValues, Expression, Granularity,
    GroupDefinition, GroupDefinitionType, MetricValue,
};
use aws_sdk_organizations::operation::list_accounts::ListAccountsOutput;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::{AccountDirectory, AccountPage, CostPage, CostQuery, CostSource, TimeBucket};
use crate::error::{CostReportError, CostReportResult};
use crate::models::{Account, Dimension, DimensionFilter, DATE_FORMAT};

/// Connection options for [`AwsBilling`]
#[derive(Debug, Clone, Default)]
pub struct AwsBillingConfig {
    /// Named profile from the shared AWS config files
    pub profile: Option<String>,
    /// Region override (Cost Explorer itself is served from us-east-1)
    pub region: Option<String>,
    /// Custom endpoint, e.g. for a local mock
    pub endpoint_url: Option<String>,
}

impl AwsBillingConfig {
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }
}

/// Cost Explorer and Organizations clients sharing one authenticated session
pub struct AwsBilling {
    runtime: Runtime,
    cost_explorer: aws_sdk_costexplorer::Client,
    organizations: aws_sdk_organizations::Client,
}

impl AwsBilling {
    /// Load credentials from the standard chain and build both clients
    pub fn connect(config: &AwsBillingConfig) -> CostReportResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CostReportError::Config(format!("Failed to start runtime: {}", e)))?;

        let sdk_config = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(profile) = &config.profile {
                loader = loader.profile_name(profile);
            }
            if let Some(region) = &config.region {
                loader = loader.region(Region::new(region.clone()));
            }
            if let Some(url) = &config.endpoint_url {
                loader = loader.endpoint_url(url);
            }
            loader.load().await
        });

        info!(
            profile = config.profile.as_deref().unwrap_or("default"),
            region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("unset"),
            "Connected to AWS"
        );

        Ok(Self {
            runtime,
            cost_explorer: aws_sdk_costexplorer::Client::new(&sdk_config),
            organizations: aws_sdk_organizations::Client::new(&sdk_config),
        })
    }
}

impl CostSource for AwsBilling {
    fn cost_page(&self, query: &CostQuery, next_token: Option<&str>) -> CostReportResult<CostPage> {
        let metric = query.metric.as_str();
        let interval = DateInterval::builder()
            .start(query.window.start_str())
            .end(query.window.end_str())
            .build()
            .map_err(|e| CostReportError::Billing(format!("Invalid time period: {}", e)))?;

        let mut request = self
            .cost_explorer
            .get_cost_and_usage()
            .time_period(interval)
            .granularity(Granularity::Monthly)
            .metrics(metric)
            .set_filter(filter_expression(&query.filters))
            .set_next_page_token(next_token.map(str::to_string));

        if let Some(dimension) = query.group_by {
            request = request.group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(dimension.api_key())
                    .build(),
            );
        }

        debug!(
            window = %query.window,
            group_by = ?query.group_by,
            filters = ?query.filters,
            "GetCostAndUsage"
        );

        let response = self.runtime.block_on(request.send()).map_err(|e| {
            CostReportError::Billing(format!("GetCostAndUsage failed: {}", DisplayErrorContext(&e)))
        })?;

        buckets_from_output(&response, query.group_by, metric)
    }
}

impl AccountDirectory for AwsBilling {
    fn accounts_page(&self, next_token: Option<&str>) -> CostReportResult<AccountPage> {
        let request = self
            .organizations
            .list_accounts()
            .set_next_token(next_token.map(str::to_string));

        let response = self.runtime.block_on(request.send()).map_err(|e| {
            CostReportError::Directory(format!(
                "ListAccounts failed: {}",
                aws_sdk_organizations::error::DisplayErrorContext(&e)
            ))
        })?;

        Ok(accounts_from_output(&response))
    }
}

/// Convert one `GetCostAndUsage` page into time buckets
///
/// Grouped queries read each group's first key and metrics; ungrouped queries
/// read the result's `Total`.
fn buckets_from_output(
    output: &GetCostAndUsageOutput,
    group_by: Option<Dimension>,
    metric: &str,
) -> CostReportResult<CostPage> {
    let mut buckets = Vec::with_capacity(output.results_by_time().len());

    for result in output.results_by_time() {
        let start = result
            .time_period()
            .map(|p| p.start())
            .ok_or_else(|| CostReportError::Billing("Result without time period".into()))?;
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|e| {
            CostReportError::Billing(format!("Invalid period start '{}': {}", start, e))
        })?;

        let bucket = if group_by.is_some() {
            let mut groups = Vec::with_capacity(result.groups().len());
            for group in result.groups() {
                let key = group.keys().first().cloned().unwrap_or_default();
                let amount = metric_amount(group.metrics(), metric, &key)?;
                groups.push((key, amount));
            }
            TimeBucket::grouped(start, groups)
        } else {
            TimeBucket::total(start, metric_amount(result.total(), metric, "total")?)
        };
        buckets.push(bucket);
    }

    Ok(CostPage {
        buckets,
        next_token: output.next_page_token().map(str::to_string),
    })
}

/// Convert one `ListAccounts` page; accounts without an id are skipped
fn accounts_from_output(output: &ListAccountsOutput) -> AccountPage {
    let accounts = output
        .accounts()
        .iter()
        .filter_map(|a| {
            let id = a.id()?;
            Some(Account::new(id, a.name().unwrap_or_default()))
        })
        .collect();

    AccountPage {
        accounts,
        next_token: output.next_token().map(str::to_string),
    }
}

/// Build the Cost Explorer filter for a set of equality constraints
fn filter_expression(filters: &[DimensionFilter]) -> Option<Expression> {
    let mut expressions: Vec<Expression> = filters
        .iter()
        .map(|f| {
            Expression::builder()
                .dimensions(
                    DimensionValues::builder()
                        .key(CeDimension::from(f.dimension.api_key()))
                        .values(f.value.clone())
                        .build(),
                )
                .build()
        })
        .collect();

    match expressions.len() {
        0 => None,
        1 => expressions.pop(),
        _ => Some(Expression::builder().set_and(Some(expressions)).build()),
    }
}

/// Read one metric out of a metrics map; a missing metric counts as zero
fn metric_amount(
    metrics: Option<&HashMap<String, MetricValue>>,
    metric: &str,
    dimension_value: &str,
) -> CostReportResult<f64> {
    match metrics.and_then(|m| m.get(metric)).and_then(|v| v.amount()) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| CostReportError::invalid_amount(dimension_value, raw)),
        None => Ok(0.0),
    }
}
