//! Spawns the test runner, aggregates its verdict, retries failed passes.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::notify;
use crate::summary::{SuiteSummary, parse_summary};

pub async fn execute(
    filter: Option<&str>,
    workers: usize,
    retries: u32,
    live: bool,
    webhook: Option<&str>,
) -> Result<()> {
    let attempts = retries + 1;
    let mut summary = SuiteSummary::default();

    for attempt in 1..=attempts {
        if attempt > 1 {
            warn!(target: "golive", attempt, "retrying failed pass");
        }
        summary = run_suite(filter, workers, live).await?;
        print_summary(attempt, &summary);
        if summary.all_passed() {
            break;
        }
    }

    if let Some(url) = webhook {
        if let Err(err) = notify::post_summary(url, &summary).await {
            // The suite verdict stands even when chat-ops is down.
            warn!(target: "golive", %err, "summary card post failed");
        }
    }

    if summary.all_passed() {
        info!(target: "golive", "suite passed");
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} tests failed",
            summary.failed,
            summary.total()
        ))
    }
}

/// One full pass of the harness tests, transcript captured for parsing.
async fn run_suite(filter: Option<&str>, workers: usize, live: bool) -> Result<SuiteSummary> {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "-p", "golive-harness"]);
    if let Some(name) = filter {
        cmd.arg(name);
    }
    cmd.args(["--", "--test-threads", &workers.to_string()]);
    if live {
        cmd.arg("--include-ignored");
    }

    info!(target: "golive", ?filter, workers, live, "running suite");
    let output = cmd.output().await.context("spawning test runner")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // Pass the runner's own output through for the humans watching.
    print!("{stdout}");
    eprint!("{stderr}");

    parse_summary(&stdout)
}

fn print_summary(attempt: u32, summary: &SuiteSummary) {
    let verdict = if summary.all_passed() {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!(
        "\n[attempt {attempt}] {verdict}: {} passed, {} failed, {} skipped ({} total)",
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        summary.skipped.to_string().yellow(),
        summary.total()
    );
}
