//! CI-aware readiness detection for live-session UI.
//!
//! Browser-driven media UI is non-deterministic in headless environments
//! (fake media devices, variable render timing), so readiness is a
//! prioritized fallback ladder rather than a single selector wait: scenarios
//! proceed with reduced confidence instead of aborting.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Timeouts;
use crate::driver::{AppPage, Target};

/// Outcome of a readiness probe, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessSignal {
    /// Primary DOM indicator found (video stream active).
    Primary,
    /// A secondary control indicator found.
    Secondary,
    /// URL matched an expected live-session path.
    UrlPattern,
    /// Every fallback exhausted within its bound.
    TimedOut,
}

impl ReadinessSignal {
    /// Whether the application reached an expected state. `UrlPattern` is
    /// a positive signal with reduced confidence; only `TimedOut` is a
    /// miss.
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::TimedOut)
    }
}

/// A labelled readiness candidate.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub label: &'static str,
    pub target: Target,
}

impl Indicator {
    pub fn new(label: &'static str, target: Target) -> Self {
        Self { label, target }
    }
}

/// Ordered readiness ladder with environment-scaled bounds.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    primary: Indicator,
    secondary: Vec<Indicator>,
    url_fragments: Vec<&'static str>,
    primary_timeout: Duration,
    secondary_timeout: Duration,
    settle: Duration,
}

impl ReadinessProbe {
    pub fn new(
        primary: Indicator,
        secondary: Vec<Indicator>,
        url_fragments: Vec<&'static str>,
        primary_timeout: Duration,
        secondary_timeout: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            url_fragments,
            primary_timeout,
            secondary_timeout,
            settle,
        }
    }

    /// Blocks until one readiness signal fires or the ladder is exhausted.
    ///
    /// Never returns an error: driver faults count as misses for the
    /// current rung and the probe falls through to the next one. `label`
    /// names the waiting party ("host", "invitee") in logs.
    pub async fn await_readiness(&self, page: &dyn AppPage, label: &str) -> ReadinessSignal {
        debug!(target: "golive::wait", %label, "waiting for live session to initialize");

        if self.visible(page, &self.primary, self.primary_timeout).await {
            info!(target: "golive::wait", %label, indicator = self.primary.label, "primary indicator detected");
            return ReadinessSignal::Primary;
        }
        debug!(target: "golive::wait", %label, "primary indicator not found, trying alternatives");

        for indicator in &self.secondary {
            if self.visible(page, indicator, self.secondary_timeout).await {
                info!(target: "golive::wait", %label, indicator = indicator.label, "secondary indicator detected");
                return ReadinessSignal::Secondary;
            }
        }
        debug!(target: "golive::wait", %label, "no control indicators found, checking URL pattern");

        // Last resort: brief settle, then the URL alone.
        tokio::time::sleep(self.settle).await;
        match page.current_url().await {
            Ok(url) if self.url_fragments.iter().any(|f| url.contains(f)) => {
                info!(target: "golive::wait", %label, %url, "live session detected by URL pattern");
                ReadinessSignal::UrlPattern
            }
            Ok(url) => {
                warn!(target: "golive::wait", %label, %url, "proceeding without readiness confirmation");
                ReadinessSignal::TimedOut
            }
            Err(err) => {
                warn!(target: "golive::wait", %label, %err, "URL check failed, proceeding without confirmation");
                ReadinessSignal::TimedOut
            }
        }
    }

    async fn visible(&self, page: &dyn AppPage, indicator: &Indicator, timeout: Duration) -> bool {
        match page.is_visible(&indicator.target, timeout).await {
            Ok(found) => found,
            Err(err) => {
                debug!(target: "golive::wait", indicator = indicator.label, %err, "probe error, treating as miss");
                false
            }
        }
    }
}

/// The live-session ladder: canvas first (video stream active), then the
/// session control surface, then the session URL itself.
pub fn live_session_probe(timeouts: &Timeouts) -> ReadinessProbe {
    ReadinessProbe::new(
        Indicator::new("canvas", Target::css("canvas")),
        vec![
            Indicator::new("microphone control", Target::aria("Microphone")),
            Indicator::new("camera control", Target::aria("Camera")),
            Indicator::new("live controls", Target::css(".live-controls")),
            Indicator::new("live testid", Target::css("[data-testid*=\"live\"]")),
        ],
        vec!["/live", "/session"],
        timeouts.scaled(timeouts.primary),
        timeouts.scaled(timeouts.secondary),
        timeouts.scaled(timeouts.settle),
    )
}

/// Broader media-element ladder used before interacting with previews.
pub fn media_elements_probe(timeouts: &Timeouts) -> ReadinessProbe {
    ReadinessProbe::new(
        Indicator::new(
            "media element",
            Target::css("video, canvas, [data-testid*=\"video\"], [data-testid*=\"stream\"]"),
        ),
        vec![
            Indicator::new("stream label", Target::css("[aria-label*=\"stream\"]")),
            Indicator::new("camera label", Target::css("[aria-label*=\"camera\"]")),
        ],
        vec!["/live", "/session"],
        timeouts.scaled(timeouts.primary),
        timeouts.scaled(timeouts.secondary),
        timeouts.scaled(timeouts.settle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timed_out_is_not_ready() {
        assert!(ReadinessSignal::Primary.is_ready());
        assert!(ReadinessSignal::Secondary.is_ready());
        assert!(ReadinessSignal::UrlPattern.is_ready());
        assert!(!ReadinessSignal::TimedOut.is_ready());
    }

    #[test]
    fn live_probe_scales_bounds_under_ci() {
        let probe = live_session_probe(&Timeouts::new(true));
        assert_eq!(probe.primary_timeout, Duration::from_secs(30));
        assert_eq!(probe.secondary_timeout, Duration::from_secs(15));
        assert_eq!(probe.settle, Duration::from_secs(6));
    }
}
