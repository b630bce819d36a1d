//! Scripted in-memory page driver.
//!
//! Test scenarios program a DOM-less page: which targets are visible, what
//! a click reveals, where a navigation redirects. Every interaction is
//! recorded so tests can assert on ordering (e.g. that the readiness ladder
//! probed the canvas before falling back to the URL).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{HarnessError, Result};
use crate::session::store::{Cookie, SessionSnapshot};

use super::{AppPage, Target};

/// Poll cadence for scripted waits; short so tests with millisecond
/// timeouts stay accurate.
const FAKE_POLL: Duration = Duration::from_millis(5);

/// What a scripted click does to the page.
#[derive(Debug, Clone, Default)]
pub struct ClickEffect {
    /// Targets that become visible.
    pub reveal: Vec<Target>,
    /// New page URL, if the click navigates.
    pub set_url: Option<String>,
    /// Delay before the effect lands (simulated redirect latency).
    pub after: Duration,
    /// Drop all scripted redirects, modelling a navigation rule that only
    /// applies while unauthenticated.
    pub clear_redirects: bool,
}

#[derive(Debug)]
struct PendingEffect {
    ready_at: Instant,
    effect: ClickEffect,
}

#[derive(Debug, Default)]
struct Inner {
    url: String,
    visible: Vec<String>,
    click_rules: Vec<(String, ClickEffect)>,
    goto_rules: Vec<(String, String)>,
    pending: Vec<PendingEffect>,
    snapshot: SessionSnapshot,
    fail_probes: bool,

    navigations: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    presses: Vec<(String, String)>,
    drags: Vec<(String, (f64, f64), (f64, f64))>,
    probes: Vec<String>,
}

impl Inner {
    fn settle(&mut self) {
        let now = Instant::now();
        let mut matured = Vec::new();
        self.pending.retain(|p| {
            if p.ready_at <= now {
                matured.push(p.effect.clone());
                false
            } else {
                true
            }
        });
        for effect in matured {
            for target in &effect.reveal {
                let key = target.describe();
                if !self.visible.contains(&key) {
                    self.visible.push(key);
                }
            }
            if let Some(url) = effect.set_url {
                self.url = url;
            }
            if effect.clear_redirects {
                self.goto_rules.clear();
            }
        }
    }

    fn is_visible(&mut self, key: &str) -> bool {
        self.settle();
        self.visible.iter().any(|v| v == key)
    }
}

/// Scripted [`AppPage`] for driver-free tests.
#[derive(Debug, Default)]
pub struct FakePage {
    inner: Mutex<Inner>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.inner.lock().url = url.into();
        self
    }

    /// Marks a target as visible immediately.
    pub fn set_visible(&self, target: &Target) {
        let key = target.describe();
        let mut inner = self.inner.lock();
        if !inner.visible.contains(&key) {
            inner.visible.push(key);
        }
    }

    pub fn hide(&self, target: &Target) {
        let key = target.describe();
        self.inner.lock().visible.retain(|v| v != &key);
    }

    /// Scripts what clicking `target` does.
    pub fn on_click(&self, target: &Target, effect: ClickEffect) {
        self.inner.lock().click_rules.push((target.describe(), effect));
    }

    /// Scripts a redirect: navigating to a URL containing `fragment` lands
    /// on `redirect_to` instead.
    pub fn on_goto_contains(&self, fragment: impl Into<String>, redirect_to: impl Into<String>) {
        self.inner
            .lock()
            .goto_rules
            .push((fragment.into(), redirect_to.into()));
    }

    /// Sets the snapshot returned by `storage_state`.
    pub fn set_snapshot(&self, snapshot: SessionSnapshot) {
        self.inner.lock().snapshot = snapshot;
    }

    /// Makes every visibility probe return a driver error.
    pub fn fail_probes(&self, fail: bool) {
        self.inner.lock().fail_probes = fail;
    }

    pub fn navigations(&self) -> Vec<String> {
        self.inner.lock().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.inner.lock().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.inner.lock().fills.clone()
    }

    pub fn presses(&self) -> Vec<(String, String)> {
        self.inner.lock().presses.clone()
    }

    pub fn drags(&self) -> Vec<(String, (f64, f64), (f64, f64))> {
        self.inner.lock().drags.clone()
    }

    /// Every visibility query, in issue order.
    pub fn probes(&self) -> Vec<String> {
        self.inner.lock().probes.clone()
    }

    /// A snapshot with one session cookie, the minimal usable state.
    pub fn session_cookie_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            cookies: vec![Cookie {
                name: "appSession".into(),
                value: "fake-token".into(),
                domain: Some(".ngenux.app".into()),
                path: Some("/".into()),
                expires: Some(-1.0),
                http_only: true,
                secure: true,
                same_site: Some("Lax".into()),
            }],
            origins: vec![],
        }
    }

    fn probe(&self, target: &Target) -> Result<bool> {
        let key = target.describe();
        let mut inner = self.inner.lock();
        inner.probes.push(key.clone());
        if inner.fail_probes {
            return Err(HarnessError::Driver("scripted probe failure".into()));
        }
        Ok(inner.is_visible(&key))
    }
}

#[async_trait]
impl AppPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.navigations.push(url.to_string());
        let redirect = inner
            .goto_rules
            .iter()
            .find(|(fragment, _)| url.contains(fragment))
            .map(|(_, to)| to.clone());
        inner.url = redirect.unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.settle();
        Ok(inner.url.clone())
    }

    async fn wait_for_target(&self, target: &Target, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.probe(target)? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    ms: timeout.as_millis() as u64,
                    condition: target.describe(),
                });
            }
            tokio::time::sleep(FAKE_POLL).await;
        }
    }

    async fn is_visible(&self, target: &Target, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.probe(target)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(FAKE_POLL).await;
        }
    }

    async fn wait_for_url(&self, fragment: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.current_url().await?.contains(fragment) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    ms: timeout.as_millis() as u64,
                    condition: format!("url contains {fragment}"),
                });
            }
            tokio::time::sleep(FAKE_POLL).await;
        }
    }

    async fn click(&self, target: &Target) -> Result<()> {
        let key = target.describe();
        let mut inner = self.inner.lock();
        inner.clicks.push(key.clone());
        let effect = inner
            .click_rules
            .iter()
            .find(|(rule_key, _)| rule_key == &key)
            .map(|(_, effect)| effect.clone());
        if let Some(effect) = effect {
            inner.pending.push(PendingEffect {
                ready_at: Instant::now() + effect.after,
                effect,
            });
        }
        Ok(())
    }

    async fn fill(&self, target: &Target, value: &str) -> Result<()> {
        self.inner
            .lock()
            .fills
            .push((target.describe(), value.to_string()));
        Ok(())
    }

    async fn press(&self, target: &Target, key: &str) -> Result<()> {
        self.inner
            .lock()
            .presses
            .push((target.describe(), key.to_string()));
        Ok(())
    }

    async fn drag(&self, target: &Target, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        self.inner
            .lock()
            .drags
            .push((target.describe(), from, to));
        Ok(())
    }

    async fn storage_state(&self) -> Result<SessionSnapshot> {
        Ok(self.inner.lock().snapshot.clone())
    }
}
