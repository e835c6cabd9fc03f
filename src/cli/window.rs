//! CLI command for inspecting the query window

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::error::CostReportResult;
use crate::models::ReportWindow;

/// Arguments of `cost-report window`
#[derive(Args, Debug, Default)]
pub struct WindowArgs {
    /// Reference month (1-12)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Reference year
    #[arg(short, long)]
    pub year: Option<i32>,
}

/// Handle `cost-report window`
pub fn handle_window_command(settings: &Settings, args: WindowArgs) -> CostReportResult<()> {
    let settings = Settings {
        month: args.month.or(settings.month),
        year: args.year.or(settings.year),
        ..settings.clone()
    };
    let (month, year) = settings.reference_month(Local::now().date_naive());

    print!("{}", format_window(&ReportWindow::compute(month, year)));
    Ok(())
}

/// Terminal rendering of a window
pub fn format_window(window: &ReportWindow) -> String {
    format!(
        "Previous month: {}\nCurrent month:  {}\nQuery start:    {}\nQuery end:      {} (exclusive)\n",
        window.previous,
        window.current,
        window.start_str(),
        window.end_str()
    )
}
