//! Cost Comparison Report
//!
//! Compares each account's costs between the reference month and the month
//! before it, then drills down into the account's services and each service's
//! usage types. Every level is built the same way: aggregate over both months,
//! diff, rank, truncate.

use serde::Serialize;
use tracing::info;

use crate::billing::{AccountDirectory, CostSource};
use crate::error::{CostReportError, CostReportResult};
use crate::models::{
    Account, CostMetric, CostRow, CostTable, Dimension, DimensionFilter, ReportWindow,
};
use crate::services::{finalize, rows_from_amounts, Aggregator};

/// Rows kept in service and usage-type tables unless configured otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// Knobs for a report run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub metric: CostMetric,
    /// Row limit for service and usage-type tables; the summary is never cut
    pub top_n: Option<usize>,
    /// Restrict the report to these account ids (all accounts when empty)
    pub accounts: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            metric: CostMetric::default(),
            top_n: Some(DEFAULT_TOP_N),
            accounts: Vec::new(),
        }
    }
}

/// Usage-type breakdown of one service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceUsage {
    pub service: String,
    pub usage: CostTable,
}

/// Everything reported for one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSection {
    pub account: Account,
    /// Ranked services of the account
    pub services: CostTable,
    /// One breakdown per row of `services`, in the same order
    pub usage: Vec<ServiceUsage>,
}

/// The full organization → account → service → usage type comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComparisonReport {
    pub window: ReportWindow,
    pub metric: CostMetric,
    /// One row per account, ranked
    pub summary: CostTable,
    /// Per-account drill-down, in directory order
    pub sections: Vec<AccountSection>,
}

/// Builds a [`CostComparisonReport`] from the billing collaborators
pub struct ReportBuilder<'a> {
    costs: &'a dyn CostSource,
    directory: &'a dyn AccountDirectory,
    options: ReportOptions,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        costs: &'a dyn CostSource,
        directory: &'a dyn AccountDirectory,
        options: ReportOptions,
    ) -> Self {
        Self {
            costs,
            directory,
            options,
        }
    }

    /// Generate the report for a reference month
    pub fn build(&self, month: u32, year: i32) -> CostReportResult<CostComparisonReport> {
        let window = ReportWindow::compute(month, year);
        let aggregator = Aggregator::new(self.costs, self.options.metric);

        info!(%window, metric = %self.options.metric, "Building cost comparison report");

        let accounts = self.select_accounts(self.directory.list_accounts()?)?;

        let mut summary_rows = Vec::with_capacity(accounts.len());
        for account in &accounts {
            let totals = aggregator.totals(&window, &[DimensionFilter::account(&account.id)])?;
            summary_rows.push(CostRow::new(
                &account.id,
                &account.name,
                totals.past,
                totals.current,
            ));
        }
        let summary = finalize(Dimension::LinkedAccount, summary_rows, None);

        let mut sections = Vec::with_capacity(accounts.len());
        for account in accounts {
            info!(account = %account, "Processing account");
            sections.push(self.account_section(&aggregator, &window, account)?);
        }

        Ok(CostComparisonReport {
            window,
            metric: self.options.metric,
            summary,
            sections,
        })
    }

    fn account_section(
        &self,
        aggregator: &Aggregator<'_>,
        window: &ReportWindow,
        account: Account,
    ) -> CostReportResult<AccountSection> {
        let account_filter = DimensionFilter::account(&account.id);
        let services = self.ranked(aggregator, window, Dimension::Service, &[account_filter.clone()])?;

        let mut usage = Vec::with_capacity(services.len());
        for row in &services {
            let filters = [
                account_filter.clone(),
                DimensionFilter::service(&row.dimension_value),
            ];
            usage.push(ServiceUsage {
                service: row.dimension_value.clone(),
                usage: self.ranked(aggregator, window, Dimension::UsageType, &filters)?,
            });
        }

        Ok(AccountSection {
            account,
            services,
            usage,
        })
    }

    /// Aggregate, diff, rank and truncate one level
    fn ranked(
        &self,
        aggregator: &Aggregator<'_>,
        window: &ReportWindow,
        group_by: Dimension,
        filters: &[DimensionFilter],
    ) -> CostReportResult<CostTable> {
        let amounts = aggregator.aggregate(window, group_by, filters)?;
        Ok(finalize(group_by, rows_from_amounts(amounts), self.options.top_n))
    }

    /// Apply the account restriction, keeping directory order
    fn select_accounts(&self, accounts: Vec<Account>) -> CostReportResult<Vec<Account>> {
        if self.options.accounts.is_empty() {
            return Ok(accounts);
        }

        if let Some(missing) = self
            .options
            .accounts
            .iter()
            .find(|id| !accounts.iter().any(|a| &a.id == *id))
        {
            return Err(CostReportError::Validation(format!(
                "Account not found in organization: {}",
                missing
            )));
        }

        Ok(accounts
            .into_iter()
            .filter(|a| self.options.accounts.contains(&a.id))
            .collect())
    }
}

impl CostComparisonReport {
    /// Section for an account id
    pub fn section(&self, account_id: &str) -> Option<&AccountSection> {
        self.sections.iter().find(|s| s.account.id == account_id)
    }

    /// Format the report header and account summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Cost Comparison: {} vs {} ({})\n",
            self.window.previous, self.window.current, self.metric
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Total Past Month:    {:>14.2}\n",
            self.summary.total_past()
        ));
        output.push_str(&format!(
            "Total Current Month: {:>14.2}\n",
            self.summary.total_current()
        ));
        output.push_str(&format!(
            "Total Change:        {:>+14.2}\n\n",
            self.summary.total_current() - self.summary.total_past()
        ));
        output.push_str(&crate::display::format_summary_table(&self.summary));
        output.push('\n');

        output
    }

    /// Format every account's service table for terminal display
    pub fn format_details(&self) -> String {
        let mut output = String::new();

        for section in &self.sections {
            output.push_str(&format!("\n{}\n", section.account));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&crate::display::format_cost_table(&section.services));
            output.push('\n');
        }

        output
    }
}
