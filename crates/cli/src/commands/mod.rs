mod run;
mod session;

use anyhow::{Context, Result};

use crate::cli::{Commands, SessionAction};
use crate::{notify, summary};

pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            filter,
            workers,
            retries,
            live,
            webhook,
        } => run::execute(filter.as_deref(), workers, retries, live, webhook.as_deref()).await,
        Commands::Notify {
            summary_file,
            webhook,
        } => {
            let transcript = std::fs::read_to_string(&summary_file)
                .with_context(|| format!("reading {}", summary_file.display()))?;
            let summary = summary::parse_summary(&transcript)?;
            notify::post_summary(&webhook, &summary).await
        }
        Commands::Session { action } => match action {
            SessionAction::Show { auth_file } => session::show(auth_file),
            SessionAction::Clear { auth_file } => session::clear(auth_file),
        },
    }
}
