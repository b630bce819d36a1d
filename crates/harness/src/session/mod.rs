//! Authenticated-session subsystem: persisted snapshot store, session
//! establishment, the per-navigation authentication guard, and the
//! once-per-process setup gate.

use std::time::Duration;

use tracing::debug;

use crate::config::HarnessConfig;
use crate::driver::{AppPage, Target};
use crate::error::{HarnessError, Result};

pub mod establish;
pub mod guard;
pub mod setup;
pub mod store;

pub use establish::SessionEstablisher;
pub use guard::{AuthGuard, GuardedPage};
pub use setup::{SetupGate, bootstrap_session, session_gate};
pub use store::{SessionSnapshot, SessionStore};

/// URL fragment identifying the identity-provider login form.
pub const IDP_URL_FRAGMENT: &str = "auth0.com/login";

/// Post-login landing URL fragment.
pub const DASHBOARD_URL_FRAGMENT: &str = "dashboard";

/// Path fragments that mark a navigation as application-internal and
/// therefore subject to the authentication guard.
pub const APP_PATH_FRAGMENTS: &[&str] = &["/project", "/dashboard"];

/// Locators for the login journey, shared by the establisher and the guard.
#[derive(Debug, Clone)]
pub struct LoginUi {
    /// Identifier field on the identity-provider form.
    pub email: Target,
    /// Secret field on the identity-provider form.
    pub password: Target,
    /// Form submit control.
    pub submit: Target,
    /// Authenticated-only indicator on the landing page.
    pub authenticated: Target,
    /// Optional landing-page link towards the login entry.
    pub goto_login_link: Target,
    /// Optional login entry control.
    pub login_entry: Target,
}

impl Default for LoginUi {
    fn default() -> Self {
        Self {
            email: Target::css("#login-email"),
            password: Target::css("#login-password"),
            submit: Target::css("#btn-login"),
            authenticated: Target::text("Go Live"),
            goto_login_link: Target::text("Go to Login"),
            login_entry: Target::text("Login"),
        }
    }
}

/// Fills and submits the identity-provider form, then waits (bounded) for
/// the authenticated-only indicator. Shared by establishment and the
/// guard's inline re-login; the caller is responsible for having reached
/// the identity-provider page first.
pub(crate) async fn submit_idp_login(
    page: &dyn AppPage,
    config: &HarnessConfig,
    ui: &LoginUi,
    post_login: Duration,
) -> Result<()> {
    page.fill(&ui.email, &config.credentials.identifier)
        .await
        .map_err(|e| HarnessError::auth_step("fill identifier", e))?;
    page.fill(&ui.password, &config.credentials.secret)
        .await
        .map_err(|e| HarnessError::auth_step("fill secret", e))?;
    page.click(&ui.submit)
        .await
        .map_err(|e| HarnessError::auth_step("submit login form", e))?;
    debug!(target: "golive::session", "login form submitted");

    page.wait_for_target(&ui.authenticated, post_login)
        .await
        .map_err(|e| HarnessError::auth_step("wait for authenticated indicator", e))
}
