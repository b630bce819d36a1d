//! Live end-to-end scenarios against a real deployment.
//!
//! These require a local Chromium install and valid credentials in the
//! environment (`VALID_EMAIL`, `VALID_PASSWORD`, `DASHBOARD_URL`):
//!
//! ```sh
//! cargo test --test live_smoke -- --ignored --test-threads=1
//! ```

use golive_harness::config::HarnessConfig;
use golive_harness::data::GoLiveData;
use golive_harness::driver::ChromiumDriver;
use golive_harness::pages::GoLivePage;
use golive_harness::session::setup::{bootstrap_session, session_gate};
use golive_harness::session::{SessionEstablisher, SessionStore};
use golive_harness::wait::{live_session_probe, media_elements_probe};
use golive_harness::{AppPage, AuthGuard, GuardedPage};

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn authenticated_page(
    driver: &ChromiumDriver,
    config: &HarnessConfig,
) -> anyhow::Result<GuardedPage<golive_harness::driver::ChromiumPage>> {
    let store = SessionStore::new(&config.auth_file);
    let establisher = SessionEstablisher::new(config.clone(), store.clone());

    let page = match store.load().filter(|_| store.usable()) {
        Some(snapshot) => driver.new_page_with_snapshot(&snapshot).await?,
        None => driver.new_page().await?,
    };
    bootstrap_session(session_gate(), &establisher, &page).await?;

    Ok(GuardedPage::new(page, AuthGuard::new(config.clone(), store)))
}

#[tokio::test]
#[ignore = "needs a Chromium install and live credentials"]
async fn host_starts_and_stops_a_stream() -> anyhow::Result<()> {
    init_logs();
    let config = HarnessConfig::from_env();
    let data = GoLiveData::default();

    let driver = ChromiumDriver::launch(&config).await?;
    let page = authenticated_page(&driver, &config).await?;

    let go_live = GoLivePage::new(&page, config.timeouts);
    go_live.goto_dashboard(&config.dashboard_url).await?;
    go_live.go_to_go_live().await?;

    // Previews render asynchronously; interact only once a media element
    // (or its fallback) has appeared.
    let preview = media_elements_probe(&config.timeouts)
        .await_readiness(&page, "host preview")
        .await;
    if preview.is_ready() {
        go_live.interact_camera_preview().await?;
    }

    go_live
        .fill_stream_details(&data.stream_title, &data.stream_description, &data.invite_email)
        .await?;
    go_live.choose_start_option(false).await?;
    go_live.start_stream().await?;

    let signal = live_session_probe(&config.timeouts)
        .await_readiness(&page, "host")
        .await;
    assert!(signal.is_ready(), "live session never initialized: {signal:?}");

    go_live.stop_stream().await?;
    driver.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a Chromium install and live credentials"]
async fn stream_settings_panel_toggles() -> anyhow::Result<()> {
    init_logs();
    let config = HarnessConfig::from_env();

    let driver = ChromiumDriver::launch(&config).await?;
    let page = authenticated_page(&driver, &config).await?;

    let go_live = GoLivePage::new(&page, config.timeouts);
    go_live.goto_dashboard(&config.dashboard_url).await?;
    go_live.go_to_go_live().await?;

    go_live.expand_stream_settings().await?;
    go_live.toggle_record().await?;
    go_live.toggle_allow_broadcast().await?;
    go_live.collapse_stream_settings().await?;

    driver.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a Chromium install and live credentials"]
async fn expired_session_is_relogged_in_under_guard() -> anyhow::Result<()> {
    init_logs();
    let config = HarnessConfig::from_env();
    let store = SessionStore::new(&config.auth_file);
    store.clear()?;

    let driver = ChromiumDriver::launch(&config).await?;
    let inner = driver.new_page().await?;
    let page = GuardedPage::new(inner, AuthGuard::new(config.clone(), store.clone()));

    page.goto(&config.dashboard_url).await?;
    page.guard().ensure_authenticated(page.inner()).await?;
    assert!(store.usable(), "guard login must refresh the snapshot");

    driver.close().await?;
    Ok(())
}
