use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use cost_report::cli::{handle_run_command, handle_window_command, RunArgs, WindowArgs};
use cost_report::config::{paths::ReportPaths, settings::Settings};
use cost_report::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "cost-report",
    version,
    about = "Month-over-month AWS cost comparison",
    long_about = "cost-report compares an AWS organization's costs between a reference \
                  month and the month before it, per account, service and usage type, \
                  and writes the ranked result to a spreadsheet."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cost comparison report and write it to disk
    Run(RunArgs),

    /// Show the date window a report would query
    Window(WindowArgs),

    /// Show current configuration and paths
    Config {
        /// Write a settings file with the current values if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = ReportPaths::new()?;
    let settings = Settings::load_or_default(&paths)?;

    match cli.command {
        Some(Commands::Run(args)) => handle_run_command(&settings, args)?,
        Some(Commands::Window(args)) => handle_window_command(&settings, args)?,
        Some(Commands::Config { init }) => {
            if init && !paths.settings_file().exists() {
                settings.save(&paths)?;
                println!("Created {}", paths.settings_file().display());
                println!();
            }
            println!("cost-report Configuration");
            println!("=========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  {}", serde_json::to_string_pretty(&settings)?.replace('\n', "\n  "));
        }
        None => {
            println!("cost-report - month-over-month AWS cost comparison");
            println!();
            println!("Run 'cost-report --help' for usage information.");
            println!("Run 'cost-report run' to build last month's report.");
        }
    }

    Ok(())
}
