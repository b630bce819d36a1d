//! Drives a fresh page through the login form to produce a persisted
//! session snapshot.

use tracing::info;

use crate::config::HarnessConfig;
use crate::driver::AppPage;
use crate::error::{HarnessError, Result};

use super::store::{SessionSnapshot, SessionStore};
use super::{DASHBOARD_URL_FRAGMENT, IDP_URL_FRAGMENT, LoginUi, submit_idp_login};

/// Establishes an authenticated session and persists it.
///
/// Failures are not retried here; the caller (usually the setup gate)
/// decides whether to try again.
#[derive(Debug, Clone)]
pub struct SessionEstablisher {
    config: HarnessConfig,
    store: SessionStore,
    ui: LoginUi,
}

impl SessionEstablisher {
    pub fn new(config: HarnessConfig, store: SessionStore) -> Self {
        Self {
            config,
            store,
            ui: LoginUi::default(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs the full login sequence on `page` and saves the captured
    /// snapshot. The store is written on success only.
    pub async fn establish(&self, page: &dyn AppPage) -> Result<SessionSnapshot> {
        let timing = &self.config.guard_timing;
        info!(target: "golive::session", url = %self.config.dashboard_url, "creating new auth session");

        page.goto(&self.config.dashboard_url)
            .await
            .map_err(|e| HarnessError::auth_step("navigate to login entry", e))?;
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

        page.wait_for_url(
            DASHBOARD_URL_FRAGMENT,
            self.config.timeouts.scaled(timing.entry_probe),
        )
        .await
        .map_err(|e| HarnessError::auth_step("post-login redirect", e))?;

        let snapshot = page.storage_state().await?;
        self.store.save(&snapshot)?;
        info!(
            target: "golive::session",
            cookies = snapshot.cookies.len(),
            "auth session saved"
        );
        Ok(snapshot)
    }
}
