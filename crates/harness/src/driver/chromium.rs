//! Production [`AppPage`] implementation over a CDP-driven Chromium.
//!
//! DOM interaction is expressed as evaluated probe/action scripts polled on
//! a fixed cadence, which keeps the harness independent of engine-specific
//! locator APIs and behaves identically in headed and headless runs.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::session::store::{Cookie, OriginState, SessionSnapshot, StorageEntry};

use super::{AppPage, POLL_INTERVAL, Target};

/// Auto-wait bound for click/fill actions on elements that are still
/// rendering.
const ACTION_TIMEOUT: Duration = Duration::from_secs(5);

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 720;

/// Chromium launch flags that make media flows deterministic without real
/// devices. Applied under CI, where no camera or microphone exists.
const FAKE_MEDIA_ARGS: &[&str] = &[
    "--use-fake-ui-for-media-stream",
    "--use-fake-device-for-media-stream",
    "--allow-file-access-from-files",
    "--autoplay-policy=no-user-gesture-required",
];

fn driver_err<E: std::fmt::Display>(err: E) -> HarnessError {
    HarnessError::Driver(err.to_string())
}

/// Owns the browser process and the CDP message pump.
pub struct ChromiumDriver {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launches a browser for this configuration: headless with fake media
    /// devices under CI, headed locally.
    pub async fn launch(config: &HarnessConfig) -> Result<Self> {
        let viewport = Viewport {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        };

        let mut builder = BrowserConfig::builder().viewport(viewport);
        if config.ci {
            builder = builder.args(FAKE_MEDIA_ARGS.iter().map(ToString::to_string));
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(HarnessError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| HarnessError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(result) = handler.next().await {
                if let Err(err) = result {
                    debug!(target: "golive::driver", %err, "cdp handler event error");
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Opens a blank page in the default context.
    pub async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(driver_err)?;
        Ok(ChromiumPage { page })
    }

    /// Opens a page pre-seeded with a persisted session snapshot.
    ///
    /// Cookies are injected up front; localStorage entries require being on
    /// the owning origin, so each origin is visited once before seeding.
    pub async fn new_page_with_snapshot(
        &self,
        snapshot: &SessionSnapshot,
    ) -> Result<ChromiumPage> {
        let page = self.new_page().await?;
        page.apply_snapshot(snapshot).await?;
        Ok(page)
    }

    /// Closes the browser and stops the message pump.
    pub async fn close(mut self) -> Result<()> {
        if let Err(err) = self.browser.close().await {
            warn!(target: "golive::driver", %err, "browser close failed");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// A single browser tab.
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn eval_bool(&self, expr: &str) -> Result<bool> {
        let result = self.page.evaluate(expr).await.map_err(driver_err)?;
        result.into_value::<bool>().map_err(driver_err)
    }

    /// Polls `expr` until it evaluates to true or the deadline passes.
    /// Evaluation faults (mid-navigation contexts) count as misses.
    async fn poll_until(&self, expr: &str, timeout: Duration, condition: &str) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.eval_bool(expr).await.unwrap_or(false) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    ms: timeout.as_millis() as u64,
                    condition: condition.to_string(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn act(&self, target: &Target, action_js: String, action: &str) -> Result<()> {
        // Auto-wait: actions race against rendering, so give the target a
        // short visibility window first.
        self.poll_until(
            &target.probe_js(),
            ACTION_TIMEOUT,
            &format!("{action} {target}"),
        )
        .await?;

        if self.eval_bool(&action_js).await? {
            Ok(())
        } else {
            Err(HarnessError::Driver(format!(
                "{action} failed, target vanished: {target}"
            )))
        }
    }

    async fn apply_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if !snapshot.cookies.is_empty() {
            // Round-trip through the wire shape instead of hand-building
            // CDP parameter structs.
            let params: Vec<CookieParam> = snapshot
                .cookies
                .iter()
                .map(|c| {
                    serde_json::from_value(json!({
                        "name": c.name,
                        "value": c.value,
                        "domain": c.domain,
                        "path": c.path,
                        "secure": c.secure,
                        "httpOnly": c.http_only,
                    }))
                })
                .collect::<std::result::Result<_, _>>()?;
            self.page.set_cookies(params).await.map_err(driver_err)?;
        }

        for origin in &snapshot.origins {
            self.page.goto(&origin.origin).await.map_err(driver_err)?;
            for entry in &origin.local_storage {
                let expr = format!(
                    "localStorage.setItem({}, {}); true",
                    serde_json::to_string(&entry.name)?,
                    serde_json::to_string(&entry.value)?,
                );
                self.eval_bool(&expr).await?;
            }
        }
        Ok(())
    }

    async fn capture_local_storage(&self) -> Result<Option<OriginState>> {
        let origin = self
            .page
            .evaluate("location.origin")
            .await
            .map_err(driver_err)?
            .into_value::<String>()
            .map_err(driver_err)?;
        if !origin.starts_with("http") {
            return Ok(None);
        }

        let entries = self
            .page
            .evaluate("Object.entries(localStorage)")
            .await
            .map_err(driver_err)?
            .into_value::<Vec<(String, String)>>()
            .map_err(driver_err)?;

        Ok(Some(OriginState {
            origin,
            local_storage: entries
                .into_iter()
                .map(|(name, value)| StorageEntry { name, value })
                .collect(),
        }))
    }
}

#[async_trait]
impl AppPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(|e| HarnessError::Navigation {
            url: url.to_string(),
            source: anyhow::Error::new(e),
        })?;
        if let Err(err) = self.page.wait_for_navigation().await {
            // Some SPA transitions resolve before the lifecycle event; the
            // subsequent selector waits are the real readiness check.
            debug!(target: "golive::driver", %url, %err, "navigation settle wait ended early");
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.page.url().await.map_err(driver_err)?;
        Ok(url.unwrap_or_default())
    }

    async fn wait_for_target(&self, target: &Target, timeout: Duration) -> Result<()> {
        self.poll_until(&target.probe_js(), timeout, &target.describe())
            .await
    }

    async fn is_visible(&self, target: &Target, timeout: Duration) -> Result<bool> {
        match self.wait_for_target(target, timeout).await {
            Ok(()) => Ok(true),
            Err(HarnessError::Timeout { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn wait_for_url(&self, fragment: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.current_url().await.unwrap_or_default().contains(fragment) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    ms: timeout.as_millis() as u64,
                    condition: format!("url contains {fragment}"),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, target: &Target) -> Result<()> {
        let js = format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            target.finder_js()
        );
        self.act(target, js, "click").await
    }

    async fn fill(&self, target: &Target, value: &str) -> Result<()> {
        // Set through the native value setter so framework-managed inputs
        // observe the change, then fire the events a real keystroke would.
        let js = format!(
            "(() => {{
                const el = {};
                if (!el) return false;
                const proto = el.tagName === 'TEXTAREA'
                    ? HTMLTextAreaElement.prototype
                    : HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
                setter.call(el, {});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()",
            target.finder_js(),
            serde_json::to_string(value)?,
        );
        self.act(target, js, "fill").await
    }

    async fn press(&self, target: &Target, key: &str) -> Result<()> {
        let js = format!(
            "(() => {{
                const el = {};
                if (!el) return false;
                const key = {};
                for (const type of ['keydown', 'keypress', 'keyup']) {{
                    el.dispatchEvent(new KeyboardEvent(type, {{ key, bubbles: true, cancelable: true }}));
                }}
                if (key === 'Enter' && el.form) {{
                    el.form.requestSubmit ? el.form.requestSubmit() : el.form.submit();
                }}
                return true;
            }})()",
            target.finder_js(),
            serde_json::to_string(key)?,
        );
        self.act(target, js, "press").await
    }

    async fn drag(&self, target: &Target, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        // Stroke as pointer+mouse event pairs so both canvas libraries and
        // plain mouse handlers observe it.
        let js = format!(
            "(() => {{
                const el = {};
                if (!el) return false;
                const rect = el.getBoundingClientRect();
                const sx = rect.left + {}, sy = rect.top + {};
                const ex = rect.left + {}, ey = rect.top + {};
                const fire = (kind, x, y) => {{
                    const init = {{
                        bubbles: true, cancelable: true,
                        clientX: x, clientY: y,
                        button: 0, buttons: 1, pointerId: 1, isPrimary: true,
                    }};
                    el.dispatchEvent(new PointerEvent('pointer' + kind, init));
                    el.dispatchEvent(new MouseEvent('mouse' + kind, init));
                }};
                fire('down', sx, sy);
                const steps = 10;
                for (let i = 1; i <= steps; i++) {{
                    fire('move', sx + (ex - sx) * i / steps, sy + (ey - sy) * i / steps);
                }}
                fire('up', ex, ey);
                return true;
            }})()",
            target.finder_js(),
            from.0,
            from.1,
            to.0,
            to.1,
        );
        self.act(target, js, "drag").await
    }

    async fn storage_state(&self) -> Result<SessionSnapshot> {
        let cdp_cookies = self.page.get_cookies().await.map_err(driver_err)?;
        let cookies: Vec<Cookie> = serde_json::from_value(serde_json::to_value(&cdp_cookies)?)?;

        let origins = match self.capture_local_storage().await {
            Ok(origin) => origin.into_iter().collect(),
            Err(err) => {
                debug!(target: "golive::driver", %err, "localStorage capture failed, cookies only");
                Vec::new()
            }
        };

        Ok(SessionSnapshot { cookies, origins })
    }
}
