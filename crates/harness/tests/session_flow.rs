//! Session lifecycle against the scripted page driver: establishment,
//! store reuse, staleness, corrupt-store recovery, guard re-login and the
//! once-per-process setup gate.

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use golive_harness::config::{Credentials, GuardTiming, HarnessConfig, Timeouts};
use golive_harness::driver::fake::ClickEffect;
use golive_harness::session::setup::{SetupGate, bootstrap_session};
use golive_harness::{
    AppPage, AuthGuard, FakePage, GuardedPage, SessionEstablisher, SessionStore, Target,
};

const DASHBOARD: &str = "https://ngage.ngenux.app/dashboard";
const IDP_LOGIN: &str = "https://tenant.auth0.com/login?state=xyz";

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Config with millisecond bounds so misses resolve quickly.
fn fast_config(auth_file: &Path) -> HarnessConfig {
    let mut timeouts = Timeouts::new(false);
    timeouts.primary = ms(200);
    timeouts.secondary = ms(100);
    timeouts.settle = ms(20);

    HarnessConfig {
        credentials: Credentials {
            identifier: "user@example.com".to_string(),
            secret: "Secret123!".to_string(),
        },
        dashboard_url: DASHBOARD.to_string(),
        auth_file: auth_file.to_path_buf(),
        ci: false,
        timeouts,
        guard_timing: GuardTiming {
            quick_check: ms(80),
            entry_probe: ms(40),
            idp_redirect: ms(400),
            post_login: ms(400),
        },
    }
}

/// A page scripted like the real deployment: navigating to the dashboard
/// while unauthenticated bounces to the identity provider, and submitting
/// the login form lands back on the dashboard with the app rendered.
fn scripted_idp_page() -> FakePage {
    let page = FakePage::new().with_url("about:blank");
    page.on_goto_contains("/dashboard", IDP_LOGIN);
    page.on_click(
        &Target::css("#btn-login"),
        ClickEffect {
            reveal: vec![Target::text("Go Live")],
            set_url: Some(DASHBOARD.to_string()),
            after: ms(30),
            clear_redirects: true,
        },
    );
    page.set_snapshot(FakePage::session_cookie_snapshot());
    page
}

fn submit_count(page: &FakePage) -> usize {
    page.clicks()
        .iter()
        .filter(|c| c.as_str() == "css=#btn-login")
        .count()
}

#[tokio::test]
async fn fresh_store_establishes_and_quick_check_reuses_it() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);
    let page = scripted_idp_page();

    let establisher = SessionEstablisher::new(config.clone(), store.clone());
    let snapshot = establisher.establish(&page).await.unwrap();
    assert!(snapshot.has_cookies());
    assert!(store.usable());

    // The authenticated indicator is on screen; the guard must not drive
    // a second form submission.
    let guard = AuthGuard::new(config, store);
    guard.ensure_authenticated(&page).await.unwrap();
    assert_eq!(submit_count(&page), 1);
    assert_eq!(page.fills().len(), 2);
}

#[tokio::test]
async fn failed_establishment_never_writes_the_store() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);

    // The IdP redirect happens, but submitting the form does nothing: the
    // authenticated indicator never renders.
    let page = FakePage::new().with_url("about:blank");
    page.on_goto_contains("/dashboard", IDP_LOGIN);
    page.set_snapshot(FakePage::session_cookie_snapshot());

    let establisher = SessionEstablisher::new(config, store.clone());
    let outcome = establisher.establish(&page).await;

    assert!(matches!(
        outcome,
        Err(golive_harness::HarnessError::Auth { .. })
    ));
    assert_eq!(submit_count(&page), 1, "the form was submitted before the wait expired");
    assert!(store.load().is_none(), "a failed login must leave the store untouched");
}

#[tokio::test]
async fn stale_snapshot_triggers_full_relogin() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);

    // Zero-width freshness window: anything persisted is already stale.
    let store = SessionStore::with_freshness(&auth_file, Duration::ZERO);
    store.save(&FakePage::session_cookie_snapshot()).unwrap();
    assert!(store.load().is_some());
    assert!(!store.usable());

    let page = scripted_idp_page();
    let establisher = SessionEstablisher::new(config, store);
    let gate = SetupGate::new();
    bootstrap_session(&gate, &establisher, &page).await.unwrap();

    assert_eq!(submit_count(&page), 1, "stale snapshot must not be reused");
}

#[tokio::test]
async fn corrupt_store_file_falls_back_to_establishment() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    std::fs::write(&auth_file, "{not json").unwrap();

    let store = SessionStore::new(&auth_file);
    assert!(store.load().is_none());

    let page = scripted_idp_page();
    let establisher = SessionEstablisher::new(fast_config(&auth_file), store.clone());
    let gate = SetupGate::new();
    bootstrap_session(&gate, &establisher, &page).await.unwrap();

    assert_eq!(submit_count(&page), 1);
    assert!(store.usable(), "recovered store holds the fresh snapshot");
}

#[tokio::test]
async fn guard_runs_full_login_when_indicator_is_missing() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);
    let page = scripted_idp_page();

    let guard = AuthGuard::new(config, store.clone());
    guard.ensure_authenticated(&page).await.unwrap();

    let fills = page.fills();
    assert_eq!(
        fills,
        vec![
            ("css=#login-email".to_string(), "user@example.com".to_string()),
            ("css=#login-password".to_string(), "Secret123!".to_string()),
        ]
    );
    assert!(store.usable(), "inline login refreshes the snapshot");
}

#[tokio::test]
async fn gate_establishes_exactly_once_across_sequential_bootstraps() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let store = SessionStore::new(&auth_file);
    let page = scripted_idp_page();
    let establisher = SessionEstablisher::new(fast_config(&auth_file), store);

    let gate = SetupGate::new();
    for _ in 0..3 {
        bootstrap_session(&gate, &establisher, &page).await.unwrap();
    }

    assert!(gate.is_done().await);
    assert_eq!(submit_count(&page), 1);
}

#[tokio::test]
async fn gate_failure_leaves_retry_open() {
    let gate = SetupGate::new();

    let failed = gate
        .run_once(|| async {
            Err(golive_harness::HarnessError::Config("boom".to_string()))
        })
        .await;
    assert!(failed.is_err());
    assert!(!gate.is_done().await, "failed init must not latch the gate");

    let ran = gate.run_once(|| async { Ok(()) }).await.unwrap();
    assert!(ran);
    let skipped = gate.run_once(|| async { Ok(()) }).await.unwrap();
    assert!(!skipped);

    gate.reset().await;
    assert!(!gate.is_done().await);
}

#[tokio::test]
async fn guarded_navigation_relogs_in_and_reissues_the_goto() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);

    let inner = scripted_idp_page();
    let guarded = GuardedPage::new(inner, AuthGuard::new(config, store));

    guarded.goto(DASHBOARD).await.unwrap();

    // Initial navigation, the guard's login-entry navigation, and the
    // re-issued original navigation.
    assert_eq!(guarded.inner().navigations().len(), 3);
    assert_eq!(submit_count(guarded.inner()), 1);
    assert_eq!(guarded.inner().current_url().await.unwrap(), DASHBOARD);
}

#[tokio::test]
async fn guarded_navigation_survives_probe_errors() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);

    let inner = FakePage::new().with_url("about:blank");
    inner.fail_probes(true);
    let guarded = GuardedPage::new(inner, AuthGuard::new(config, store));

    guarded.goto(DASHBOARD).await.unwrap();
    assert_eq!(
        guarded.inner().navigations(),
        vec![DASHBOARD.to_string()],
        "a failing probe must not trigger a login or fail the navigation"
    );
}

#[tokio::test]
async fn non_app_urls_bypass_the_guard() {
    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    let config = fast_config(&auth_file);
    let store = SessionStore::new(&auth_file);

    let inner = FakePage::new();
    let guarded = GuardedPage::new(inner, AuthGuard::new(config, store));

    guarded.goto("https://status.example.com/health").await.unwrap();
    assert!(guarded.inner().probes().is_empty(), "no auth probe off-app");
}
