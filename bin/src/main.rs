//! gwdata CLI - windowed downloader for India-WRIS groundwater-level data.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use gwdata_lib::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "gwdata")]
#[command(about = "Windowed downloader for India-WRIS groundwater-level data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download groundwater levels for one district
    Download(commands::download::DownloadArgs),

    /// Show the date windows a download would request, without fetching
    Plan {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// Maximum window length in days
        #[arg(long, default_value_t = gwdata_lib::DEFAULT_STEP_DAYS)]
        step_days: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PlanFormat,
    },
}

/// How `plan` prints its windows.
#[derive(Clone, Copy, clap::ValueEnum)]
enum PlanFormat {
    Text,
    Json,
}

/// Builds the log filter: `RUST_LOG` wins, otherwise verbosity decides.
fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        EnvFilter::new(format!(
            "gwdata={level},gwdata_lib={level},gwdata_fetch={level},gwdata_aggregate={level},gwdata_format={level}"
        ))
    })
}

fn init_tracing(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, quiet))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Download(args) => {
            let cancel = CancelSignal::shared();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::warn!("interrupt received, cancelling remaining windows");
                        cancel.cancel();
                    }
                }
            });
            commands::download::download(args, cancel, cli.quiet).await
        }
        Commands::Plan {
            start,
            end,
            step_days,
            format,
        } => commands::plan::plan(&start, &end, step_days, format),
    }
}
