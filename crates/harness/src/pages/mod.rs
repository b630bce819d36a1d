//! Page objects for the application under test.
//!
//! Each page object owns its locators and exposes intent-level operations
//! over an [`AppPage`]. Locator unions are ordered candidate lists; the
//! first visible candidate wins.

use std::time::Duration;

use tracing::debug;

use crate::driver::{AppPage, Target};
use crate::error::{HarnessError, Result};

pub mod go_live;
pub mod start_class;
pub mod whiteboard;

pub use go_live::GoLivePage;
pub use start_class::StartClassPage;
pub use whiteboard::{Tool, WhiteboardPage};

/// Returns the first candidate that becomes visible within `timeout`,
/// checked in order. `None` when every candidate stays hidden.
pub(crate) async fn first_visible<'t>(
    page: &dyn AppPage,
    candidates: &'t [Target],
    timeout: Duration,
) -> Result<Option<&'t Target>> {
    for target in candidates {
        if page.is_visible(target, timeout).await? {
            return Ok(Some(target));
        }
    }
    Ok(None)
}

/// Clicks the first visible candidate. `Ok(false)` when none appeared.
pub(crate) async fn click_first(
    page: &dyn AppPage,
    candidates: &[Target],
    timeout: Duration,
) -> Result<bool> {
    match first_visible(page, candidates, timeout).await? {
        Some(target) => {
            page.click(target).await?;
            Ok(true)
        }
        None => {
            debug!(target: "golive::pages", candidates = ?describe_all(candidates), "no candidate visible");
            Ok(false)
        }
    }
}

/// Fills the first visible candidate; an all-hidden union is an error since
/// form fields are required for the flow to proceed.
pub(crate) async fn fill_first(
    page: &dyn AppPage,
    candidates: &[Target],
    value: &str,
    timeout: Duration,
) -> Result<()> {
    match first_visible(page, candidates, timeout).await? {
        Some(target) => page.fill(target, value).await,
        None => Err(HarnessError::Timeout {
            ms: timeout.as_millis() as u64,
            condition: describe_all(candidates).join(" | "),
        }),
    }
}

fn describe_all(candidates: &[Target]) -> Vec<String> {
    candidates.iter().map(Target::describe).collect()
}
