use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "golive")]
#[command(about = "Go Live e2e suite runner and notifier")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the suite, retry failed passes, optionally post the summary card
    Run {
        /// Test-name filter passed to the runner (e.g. "session")
        #[arg(long)]
        filter: Option<String>,

        /// Concurrent test threads
        #[arg(long, default_value = "1")]
        workers: usize,

        /// Rerun attempts after a failed pass
        #[arg(long, default_value = "0")]
        retries: u32,

        /// Include live-browser scenarios that are ignored by default
        #[arg(long)]
        live: bool,

        /// Chat-ops webhook URL for the summary card
        #[arg(long, value_name = "URL")]
        webhook: Option<String>,
    },

    /// Parse a saved runner transcript and post the summary card
    Notify {
        /// Transcript file holding the runner output
        #[arg(long, value_name = "FILE")]
        summary_file: PathBuf,

        #[arg(long, value_name = "URL")]
        webhook: String,
    },

    /// Inspect or remove the persisted session snapshot
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Print the stored snapshot's age, cookie count and usability
    Show {
        /// Snapshot path (defaults to the configured AUTH_FILE)
        #[arg(long, value_name = "FILE")]
        auth_file: Option<PathBuf>,
    },
    /// Delete the stored snapshot
    Clear {
        #[arg(long, value_name = "FILE")]
        auth_file: Option<PathBuf>,
    },
}
