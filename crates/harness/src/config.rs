//! Environment-driven configuration for the suite.
//!
//! Credentials and target URLs are resolved once per process from an
//! optional `.env`-style file (path in `ENV_FILE`, default `.env.test`)
//! plus process environment overrides, and are immutable afterwards.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

/// Default freshness window for a persisted session snapshot.
pub const SESSION_FRESHNESS: Duration = Duration::from_secs(12 * 60 * 60);

/// Timeout multiplier applied when running under CI.
pub const CI_TIMEOUT_MULTIPLIER: u32 = 3;

const DEFAULT_DASHBOARD_URL: &str = "https://ngage.ngenux.app/dashboard";
const DEFAULT_AUTH_FILE: &str = "fixtures/auth.json";

/// Login identity for the application under test.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

/// Per-phase waits, scaled up under CI.
///
/// Headless CI renders media UI slower and less deterministically than a
/// local headed browser, so every bound carries the CI multiplier. Tests
/// construct this directly with millisecond values to keep runs fast.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    ci: bool,
    /// Primary readiness indicator (canvas/video).
    pub primary: Duration,
    /// Secondary readiness indicators (named controls).
    pub secondary: Duration,
    /// Fixed settle time before the URL-pattern fallback.
    pub settle: Duration,
}

impl Timeouts {
    pub fn new(ci: bool) -> Self {
        Self {
            ci,
            primary: Duration::from_secs(10),
            secondary: Duration::from_secs(5),
            settle: Duration::from_secs(2),
        }
    }

    /// Applies the CI multiplier to a local bound.
    pub fn scaled(&self, local: Duration) -> Duration {
        if self.ci {
            local * CI_TIMEOUT_MULTIPLIER
        } else {
            local
        }
    }

    pub fn is_ci(&self) -> bool {
        self.ci
    }
}

/// Bounds for the authentication guard's login sequence.
#[derive(Debug, Clone, Copy)]
pub struct GuardTiming {
    /// Quick authenticated-indicator probe on the common path.
    pub quick_check: Duration,
    /// Optional landing-page link probes ("Go to Login", "Login").
    pub entry_probe: Duration,
    /// Redirect to the identity-provider login form.
    pub idp_redirect: Duration,
    /// Post-submit wait for the authenticated-only indicator.
    pub post_login: Duration,
}

impl Default for GuardTiming {
    fn default() -> Self {
        Self {
            quick_check: Duration::from_secs(3),
            entry_probe: Duration::from_secs(5),
            idp_redirect: Duration::from_secs(15),
            post_login: Duration::from_secs(30),
        }
    }
}

/// Resolved suite configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub credentials: Credentials,
    /// Login entry point; also the post-login landing area.
    pub dashboard_url: String,
    /// Path of the persisted session snapshot.
    pub auth_file: PathBuf,
    /// Whether this process runs under CI.
    pub ci: bool,
    pub timeouts: Timeouts,
    pub guard_timing: GuardTiming,
}

impl HarnessConfig {
    /// Resolves configuration from the environment.
    ///
    /// Missing env file is not an error; missing credentials fall back to
    /// the suite's scripted defaults so local runs work out of the box.
    pub fn from_env() -> Self {
        let env_file = std::env::var("ENV_FILE").unwrap_or_else(|_| ".env.test".to_string());
        if dotenvy::from_path(&env_file).is_ok() {
            debug!(target: "golive::config", %env_file, "loaded environment file");
        }

        let ci = std::env::var("CI").is_ok_and(|v| !v.is_empty());
        Self {
            credentials: Credentials {
                identifier: env_or("VALID_EMAIL", "user@example.com"),
                secret: env_or("VALID_PASSWORD", "Secret123!"),
            },
            dashboard_url: env_or("DASHBOARD_URL", DEFAULT_DASHBOARD_URL),
            auth_file: PathBuf::from(env_or("AUTH_FILE", DEFAULT_AUTH_FILE)),
            ci,
            timeouts: Timeouts::new(ci),
            guard_timing: GuardTiming::default(),
        }
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ci_scaling_multiplies_local_bounds() {
        let ci = Timeouts::new(true);
        assert_eq!(
            ci.scaled(Duration::from_secs(10)),
            Duration::from_secs(30)
        );

        let local = Timeouts::new(false);
        assert_eq!(
            local.scaled(Duration::from_secs(10)),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn guard_timing_defaults_match_login_flow_bounds() {
        let timing = GuardTiming::default();
        assert_eq!(timing.quick_check, Duration::from_secs(3));
        assert_eq!(timing.post_login, Duration::from_secs(30));
    }
}
