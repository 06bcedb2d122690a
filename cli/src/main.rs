//! CLI for the Jenkins PR collector.
//!
//! Loads the plugin list from the Jenkins update center, searches the
//! `jenkinsci` organisation month by month and writes the pull requests that
//! carry plugin-modernizer traces to JSON.

use chrono::NaiveDate;
use clap::Parser;
use jenkins_pr_collector::{
    CancelHandle, Cancellation, DateRange, RunSummary, Runner, RunnerConfig, RunnerError,
    DATE_FORMAT,
};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Jenkins PR collector - find plugin-modernizer pull requests across jenkinsci.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// First day to search (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,

    /// Last day to search, inclusive (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,

    /// Output file for matched pull requests.
    #[arg(long, default_value = "jenkins_prs.json")]
    output: PathBuf,

    /// Output file for every pull request found.
    #[arg(long, default_value = "found_prs.json")]
    found_prs: PathBuf,

    /// Update-center document URL.
    #[arg(
        long,
        default_value = "https://updates.jenkins.io/current/update-center.actual.json"
    )]
    update_center: String,

    /// GitHub organisation to search.
    #[arg(long, default_value = "jenkinsci")]
    org: String,

    /// GitHub API base URL.
    #[arg(long, default_value = "https://api.github.com")]
    api_url: String,

    /// Maximum GraphQL requests per second.
    #[arg(long, default_value = "1")]
    requests_per_second: NonZeroU32,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    request_timeout: u64,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{value}', expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let (handle, cancellation) = Cancellation::pair();
    tokio::spawn(cancel_on_ctrl_c(handle));

    match run(args, cancellation).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancelled() => {
            error!(error = %e, "Run cancelled");
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with a compact formatter and `RUST_LOG` filtering,
/// falling back to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn cancel_on_ctrl_c(handle: CancelHandle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("Interrupted, cancelling pending requests");
            handle.cancel();
        }
        Err(e) => warn!(error = %e, "Unable to listen for Ctrl-C"),
    }
}

/// Main execution logic.
async fn run(args: Args, cancellation: Cancellation) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.token, DateRange::inclusive(args.start, args.end))
        .with_output_paths(args.output, args.found_prs)
        .with_update_center_url(args.update_center)
        .with_organization(args.org)
        .with_api_url(args.api_url)
        .with_requests_per_second(args.requests_per_second)
        .with_request_timeout(Duration::from_secs(args.request_timeout));

    let runner = Runner::new(config)?;
    runner.run(cancellation).await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Plugins in registry: {}", summary.plugins_in_registry);
    println!("  Windows searched: {}", summary.windows_searched);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Pull requests found: {}", summary.pull_requests_found);
    println!("  Matched: {}", summary.matched);
    println!("  Skipped (not a plugin): {}", summary.skipped_not_plugin);
    println!("  Skipped (bot author): {}", summary.skipped_bot_author);
    println!("  Skipped (no marker): {}", summary.skipped_no_marker);
    println!(
        "  Found PRs file: {}",
        if summary.found_prs_written {
            "written"
        } else {
            "not written"
        }
    );
}
