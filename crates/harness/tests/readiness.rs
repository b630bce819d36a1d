//! Readiness ladder behavior against the scripted page driver: strict
//! probe order, bounded timeout, and the URL-pattern fallback.

use std::time::{Duration, Instant};

use golive_harness::config::Timeouts;
use golive_harness::wait::{media_elements_probe, Indicator, ReadinessProbe, ReadinessSignal};
use golive_harness::{FakePage, Target};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// The live-session ladder with millisecond bounds.
fn fast_live_probe() -> ReadinessProbe {
    ReadinessProbe::new(
        Indicator::new("canvas", Target::css("canvas")),
        vec![
            Indicator::new("microphone control", Target::aria("Microphone")),
            Indicator::new("live controls", Target::css(".live-controls")),
        ],
        vec!["/live", "/session"],
        ms(60),
        ms(30),
        ms(10),
    )
}

fn first_probe_index(probes: &[String], key: &str) -> Option<usize> {
    probes.iter().position(|p| p == key)
}

#[tokio::test]
async fn primary_indicator_short_circuits_the_ladder() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42");
    page.set_visible(&Target::css("canvas"));

    let signal = fast_live_probe().await_readiness(&page, "host").await;
    assert_eq!(signal, ReadinessSignal::Primary);
    assert!(signal.is_ready());

    let probes = page.probes();
    assert!(probes.iter().all(|p| p == "css=canvas"), "no fallback probed");
}

#[tokio::test]
async fn secondary_indicator_fires_after_primary_misses() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42");
    page.set_visible(&Target::css(".live-controls"));

    let signal = fast_live_probe().await_readiness(&page, "host").await;
    assert_eq!(signal, ReadinessSignal::Secondary);
}

#[tokio::test]
async fn exhausted_ladder_times_out_within_budget_without_error() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42");

    let started = Instant::now();
    let signal = fast_live_probe().await_readiness(&page, "invitee").await;
    let elapsed = started.elapsed();

    assert_eq!(signal, ReadinessSignal::TimedOut);
    assert!(!signal.is_ready());
    // Budget: primary 60ms + 2×30ms secondary + 10ms settle, plus slack.
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn url_fallback_fires_only_after_dom_probes() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42/live");

    let signal = fast_live_probe().await_readiness(&page, "host").await;
    assert_eq!(signal, ReadinessSignal::UrlPattern);
    assert!(signal.is_ready());

    // Strict ladder order: every canvas probe precedes the first secondary
    // probe, and both rungs were attempted before the URL won.
    let probes = page.probes();
    let canvas_last = probes.iter().rposition(|p| p == "css=canvas");
    let mic_first = first_probe_index(&probes, "aria-label=Microphone");
    let controls_first = first_probe_index(&probes, "css=.live-controls");
    assert!(canvas_last.is_some(), "primary was probed");
    assert!(mic_first.is_some() && controls_first.is_some(), "secondaries were probed");
    assert!(canvas_last < mic_first);
    assert!(mic_first < controls_first);
}

fn fast_timeouts() -> Timeouts {
    let mut timeouts = Timeouts::new(false);
    timeouts.primary = ms(60);
    timeouts.secondary = ms(30);
    timeouts.settle = ms(10);
    timeouts
}

#[tokio::test]
async fn media_probe_accepts_any_media_element_as_primary() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42");
    page.set_visible(&Target::css(
        r#"video, canvas, [data-testid*="video"], [data-testid*="stream"]"#,
    ));

    let signal = media_elements_probe(&fast_timeouts())
        .await_readiness(&page, "host preview")
        .await;
    assert_eq!(signal, ReadinessSignal::Primary);
}

#[tokio::test]
async fn media_probe_falls_back_to_stream_labels() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/project/42");
    page.set_visible(&Target::css(r#"[aria-label*="camera"]"#));

    let signal = media_elements_probe(&fast_timeouts())
        .await_readiness(&page, "host preview")
        .await;
    assert_eq!(signal, ReadinessSignal::Secondary);
}

#[tokio::test]
async fn probe_errors_count_as_misses_not_failures() {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/session/9");
    page.fail_probes(true);

    let signal = fast_live_probe().await_readiness(&page, "host").await;
    // DOM probes all error out; the URL still matches.
    assert_eq!(signal, ReadinessSignal::UrlPattern);
}
