//! Error taxonomy for the harness.

use thiserror::Error;

/// Errors surfaced by harness operations.
///
/// Recoverable conditions (stale or corrupt session files, readiness probes
/// that never fire) are handled locally and never reach this type; what is
/// left is the set of failures a test scenario should see.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Navigation to {url} failed")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Timed out after {ms}ms waiting for: {condition}")]
    Timeout { ms: u64, condition: String },

    #[error("Authentication failed during {step}: {reason}")]
    Auth { step: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser driver error: {0}")]
    Driver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Wraps any failure as an authentication failure for the named step.
    pub fn auth_step(step: &str, err: impl std::fmt::Display) -> Self {
        Self::Auth {
            step: step.to_string(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
