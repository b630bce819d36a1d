//! Per-navigation authentication check with inline re-login.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::driver::{AppPage, Target};
use crate::error::{HarnessError, Result};

use super::store::{SessionSnapshot, SessionStore};
use super::{APP_PATH_FRAGMENTS, IDP_URL_FRAGMENT, LoginUi, submit_idp_login};

/// Decides whether a page is authenticated and re-logs-in inline when it
/// is not.
///
/// The quick indicator probe keeps the common path cheap; the full flow is
/// only driven when the session has silently expired mid-run.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    config: HarnessConfig,
    store: SessionStore,
    ui: LoginUi,
}

impl AuthGuard {
    pub fn new(config: HarnessConfig, store: SessionStore) -> Self {
        Self {
            config,
            store,
            ui: LoginUi::default(),
        }
    }

    /// The authenticated-only indicator this guard probes for.
    pub fn indicator(&self) -> &Target {
        &self.ui.authenticated
    }

    /// Quick check, else full login. A probe error counts as "not
    /// authenticated" rather than failing the caller.
    pub async fn ensure_authenticated(&self, page: &dyn AppPage) -> Result<()> {
        match page
            .is_visible(&self.ui.authenticated, self.config.guard_timing.quick_check)
            .await
        {
            Ok(true) => {
                debug!(target: "golive::session", "already authenticated");
                return Ok(());
            }
            Ok(false) => {
                info!(target: "golive::session", "not authenticated, performing login");
            }
            Err(err) => {
                warn!(target: "golive::session", %err, "authentication check failed, performing login");
            }
        }

        self.login_flow(page).await
    }

    /// Full inline login: landing-page links, identity-provider form,
    /// bounded post-login indicator wait, snapshot refresh.
    ///
    /// Navigation goes through `page` directly; when `page` is the inner
    /// primitive of a [`GuardedPage`] there is no interception to recurse
    /// into.
    pub async fn login_flow(&self, page: &dyn AppPage) -> Result<()> {
        let timing = &self.config.guard_timing;

        page.goto(&self.config.dashboard_url)
            .await
            .map_err(|e| HarnessError::auth_step("navigate to login entry", e))?;

        // Landing-page variants: some deployments interpose a "Go to
        // Login" link and/or a "Login" entry control before the IdP
        // redirect. Both probes are optional.
        self.click_if_present(page, &self.ui.goto_login_link, timing.entry_probe)
            .await;
        self.click_if_present(page, &self.ui.login_entry, timing.entry_probe)
            .await;

        page.wait_for_url(IDP_URL_FRAGMENT, self.config.timeouts.scaled(timing.idp_redirect))
            .await
            .map_err(|e| HarnessError::auth_step("identity provider redirect", e))?;

        submit_idp_login(
            page,
            &self.config,
            &self.ui,
            self.config.timeouts.scaled(timing.post_login),
        )
        .await?;

        let snapshot = page.storage_state().await?;
        self.store.save(&snapshot)?;
        info!(target: "golive::session", "inline login completed, session refreshed");
        Ok(())
    }

    async fn click_if_present(&self, page: &dyn AppPage, target: &Target, probe: Duration) {
        match page.is_visible(target, probe).await {
            Ok(true) => {
                debug!(target: "golive::session", control = %target, "clicking login entry control");
                if let Err(err) = page.click(target).await {
                    warn!(target: "golive::session", control = %target, %err, "login entry click failed");
                }
            }
            Ok(false) => {}
            Err(err) => {
                debug!(target: "golive::session", control = %target, %err, "login entry probe failed");
            }
        }
    }

    fn guards_url(url: &str) -> bool {
        APP_PATH_FRAGMENTS.iter().any(|f| url.contains(f))
    }
}

/// Explicit decorator around the navigation primitive.
///
/// Navigations to application URLs are followed by a soft authentication
/// probe; an unauthenticated result triggers the guard's full login through
/// the inner, non-intercepted page and then re-issues the original
/// navigation. All other operations delegate unchanged.
pub struct GuardedPage<P: AppPage> {
    inner: P,
    guard: AuthGuard,
}

impl<P: AppPage> GuardedPage<P> {
    pub fn new(inner: P, guard: AuthGuard) -> Self {
        Self { inner, guard }
    }

    /// The undecorated page, bypassing guard interception.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    async fn guarded_goto(&self, url: &str) -> Result<()> {
        self.inner.goto(url).await?;

        let authenticated = match self
            .inner
            .is_visible(
                &self.guard.ui.authenticated,
                self.guard.config.guard_timing.quick_check,
            )
            .await
        {
            Ok(visible) => visible,
            // A failing probe must never crash the navigation itself.
            Err(err) => {
                warn!(target: "golive::session", %err, "auth probe error, continuing with current page state");
                return Ok(());
            }
        };

        if authenticated {
            debug!(target: "golive::session", "session is valid, continuing");
            return Ok(());
        }

        info!(target: "golive::session", %url, "session expired, performing fresh login");
        self.guard.login_flow(&self.inner).await?;
        self.inner.goto(url).await
    }
}

#[async_trait]
impl<P: AppPage> AppPage for GuardedPage<P> {
    async fn goto(&self, url: &str) -> Result<()> {
        if AuthGuard::guards_url(url) {
            debug!(target: "golive::session", %url, "navigating to app URL under guard");
            self.guarded_goto(url).await
        } else {
            self.inner.goto(url).await
        }
    }

    async fn current_url(&self) -> Result<String> {
        self.inner.current_url().await
    }

    async fn wait_for_target(&self, target: &Target, timeout: Duration) -> Result<()> {
        self.inner.wait_for_target(target, timeout).await
    }

    async fn is_visible(&self, target: &Target, timeout: Duration) -> Result<bool> {
        self.inner.is_visible(target, timeout).await
    }

    async fn wait_for_url(&self, fragment: &str, timeout: Duration) -> Result<()> {
        self.inner.wait_for_url(fragment, timeout).await
    }

    async fn click(&self, target: &Target) -> Result<()> {
        self.inner.click(target).await
    }

    async fn fill(&self, target: &Target, value: &str) -> Result<()> {
        self.inner.fill(target, value).await
    }

    async fn press(&self, target: &Target, key: &str) -> Result<()> {
        self.inner.press(target, key).await
    }

    async fn drag(&self, target: &Target, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        self.inner.drag(target, from, to).await
    }

    async fn storage_state(&self) -> Result<SessionSnapshot> {
        self.inner.storage_state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_urls_are_guarded_by_path_fragment() {
        assert!(AuthGuard::guards_url("https://ngage.ngenux.app/dashboard"));
        assert!(AuthGuard::guards_url("https://ngage.ngenux.app/project/42/live"));
        assert!(!AuthGuard::guards_url("https://status.example.com/health"));
        assert!(!AuthGuard::guards_url("https://example.auth0.com/login"));
    }
}
