//! Browser-driver seam.
//!
//! The harness core (session store, authentication guard, readiness probes)
//! is written against the [`AppPage`] trait so it can be exercised without a
//! real browser. [`chromium::ChromiumDriver`] is the production
//! implementation; [`fake::FakePage`] is the scripted test double.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::session::store::SessionSnapshot;

pub mod chromium;
pub mod fake;

pub use chromium::{ChromiumDriver, ChromiumPage};
pub use fake::FakePage;

/// Poll cadence for condition waits.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A declarative locator for a DOM element.
///
/// Locator unions from the application under test are expressed as ordered
/// `&[Target]` candidate lists evaluated in priority order, so new UI
/// variants are additive rather than new branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// CSS selector.
    Css(String),
    /// First visible element whose text content contains the given string.
    Text(String),
    /// Element carrying an exact `aria-label`.
    AriaLabel(String),
}

impl Target {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn aria(label: impl Into<String>) -> Self {
        Self::AriaLabel(label.into())
    }

    /// Human-readable form used in logs and timeout messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Css(s) => format!("css={s}"),
            Self::Text(t) => format!("text={t}"),
            Self::AriaLabel(l) => format!("aria-label={l}"),
        }
    }

    /// JavaScript expression resolving to the matched element or `null`.
    ///
    /// Text matching walks interactive elements first so `text=Login` hits
    /// the button rather than an ancestor container.
    pub(crate) fn finder_js(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({})", js_str(s)),
            Self::AriaLabel(l) => format!(
                "document.querySelector('[aria-label=' + JSON.stringify({}) + ']')",
                js_str(l)
            ),
            Self::Text(t) => format!(
                "(() => {{
                    const needle = {};
                    const pools = [
                        document.querySelectorAll('button, a, [role=\"button\"], [role=\"link\"]'),
                        document.querySelectorAll('*'),
                    ];
                    for (const pool of pools) {{
                        for (const el of pool) {{
                            if (el.childElementCount === 0
                                && (el.textContent || '').trim().includes(needle)
                                && el.getClientRects().length > 0) {{
                                return el;
                            }}
                        }}
                    }}
                    return null;
                }})()",
                js_str(t)
            ),
        }
    }

    /// JavaScript expression evaluating to `true` when the target is visible.
    pub(crate) fn probe_js(&self) -> String {
        format!(
            "(() => {{ const el = {}; return !!(el && el.getClientRects().length > 0); }})()",
            self.finder_js()
        )
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// One blocking step at a time against a single browser page.
///
/// Every wait carries an explicit timeout; on expiry the operation returns
/// [`HarnessError::Timeout`](crate::error::HarnessError::Timeout) and the
/// caller decides between fallback and propagation.
#[async_trait]
pub trait AppPage: Send + Sync {
    /// Navigates to `url` and waits for the load to settle.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current page URL.
    async fn current_url(&self) -> Result<String>;

    /// Polls for the target until visible or the timeout expires.
    async fn wait_for_target(&self, target: &Target, timeout: Duration) -> Result<()>;

    /// Like [`wait_for_target`](Self::wait_for_target) but a miss is
    /// `Ok(false)` rather than an error.
    async fn is_visible(&self, target: &Target, timeout: Duration) -> Result<bool>;

    /// Polls until the current URL contains `fragment`.
    async fn wait_for_url(&self, fragment: &str, timeout: Duration) -> Result<()>;

    /// Clicks the first visible match.
    async fn click(&self, target: &Target) -> Result<()>;

    /// Replaces the target's value, firing the framework-visible events.
    async fn fill(&self, target: &Target, value: &str) -> Result<()>;

    /// Dispatches a key press to the target.
    async fn press(&self, target: &Target, key: &str) -> Result<()>;

    /// Drags the pointer across the target, coordinates relative to its
    /// top-left corner. Used for canvas drawing and panning.
    async fn drag(&self, target: &Target, from: (f64, f64), to: (f64, f64)) -> Result<()>;

    /// Captures the page's authentication state (cookies + storage).
    async fn storage_state(&self) -> Result<SessionSnapshot>;
}
