//! CLI command for building the cost comparison report

use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use tracing::info;

use crate::billing::{AccountDirectory, AwsBilling, AwsBillingConfig, CostSource, InMemoryBilling};
use crate::config::{OutputFormat, Settings};
use crate::error::CostReportResult;
use crate::export::write_report;
use crate::models::CostMetric;
use crate::reports::{CostComparisonReport, ReportBuilder, ReportOptions};

/// Arguments of `cost-report run`
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Reference month (1-12); the report compares the month before it with it
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Reference year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output path (file for xlsx, directory for csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Rows kept in service and usage-type tables
    #[arg(long)]
    pub top: Option<usize>,

    /// Cost metric (AmortizedCost, UnblendedCost, ...)
    #[arg(long)]
    pub metric: Option<CostMetric>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// Custom AWS endpoint URL
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Only report on this account id (repeatable)
    #[arg(short, long = "account")]
    pub accounts: Vec<String>,

    /// Read accounts and costs from a JSON fixture instead of AWS
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Also print each account's service table
    #[arg(short, long)]
    pub details: bool,

    /// Do not print the summary table
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Settings with every flag given on the command line applied on top
    pub fn apply(&self, settings: &Settings) -> Settings {
        let mut merged = settings.clone();
        if let Some(month) = self.month {
            merged.month = Some(month);
        }
        if let Some(year) = self.year {
            merged.year = Some(year);
        }
        if let Some(output) = &self.output {
            merged.output = output.clone();
        }
        if let Some(format) = self.format {
            merged.format = format;
        }
        if let Some(top) = self.top {
            merged.top_n = top;
        }
        if let Some(metric) = self.metric {
            merged.metric = metric;
        }
        if let Some(profile) = &self.profile {
            merged.profile = Some(profile.clone());
        }
        if let Some(region) = &self.region {
            merged.region = Some(region.clone());
        }
        merged
    }

    /// AWS connection options from merged settings and the endpoint flag
    pub fn aws_config(&self, settings: &Settings) -> AwsBillingConfig {
        let mut config = AwsBillingConfig::default();
        if let Some(profile) = &settings.profile {
            config = config.with_profile(profile);
        }
        if let Some(region) = &settings.region {
            config = config.with_region(region);
        }
        if let Some(url) = &self.endpoint_url {
            config = config.with_endpoint_url(url);
        }
        config
    }
}

/// Handle `cost-report run`
pub fn handle_run_command(settings: &Settings, args: RunArgs) -> CostReportResult<()> {
    let settings = args.apply(settings);
    let (month, year) = settings.reference_month(Local::now().date_naive());

    let options = ReportOptions {
        metric: settings.metric,
        top_n: Some(settings.top_n),
        accounts: args.accounts.clone(),
    };

    let report = match &args.fixture {
        Some(path) => {
            info!(path = %path.display(), "Using billing fixture");
            let billing = InMemoryBilling::from_json_file(path)?;
            generate(&billing, &billing, options, month, year)?
        }
        None => {
            let billing = AwsBilling::connect(&args.aws_config(&settings))?;
            generate(&billing, &billing, options, month, year)?
        }
    };

    let written = write_report(&report, settings.format, &settings.output)?;

    if !args.quiet {
        print!("{}", report.format_terminal());
        if args.details {
            print!("{}", report.format_details());
        }
        println!();
    }
    println!("Report written to {}", written.display());

    Ok(())
}

fn generate(
    costs: &dyn CostSource,
    directory: &dyn AccountDirectory,
    options: ReportOptions,
    month: u32,
    year: i32,
) -> CostReportResult<CostComparisonReport> {
    ReportBuilder::new(costs, directory, options).build(month, year)
}
