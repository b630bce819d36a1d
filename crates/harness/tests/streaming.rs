//! Streaming page flow against the scripted driver, including the
//! soft-stop contract for end controls.

use std::time::Duration;

use golive_harness::config::Timeouts;
use golive_harness::data::GoLiveData;
use golive_harness::pages::GoLivePage;
use golive_harness::{FakePage, Target};

fn fast_timeouts() -> Timeouts {
    let mut timeouts = Timeouts::new(false);
    timeouts.primary = Duration::from_millis(150);
    timeouts.secondary = Duration::from_millis(40);
    timeouts.settle = Duration::from_millis(10);
    timeouts
}

fn scripted_stream_form() -> FakePage {
    let page = FakePage::new().with_url("https://ngage.ngenux.app/dashboard");
    page.set_visible(&Target::text("Go Live"));
    page.set_visible(&Target::css(r#"input[placeholder="Enter stream title"]"#));
    page.set_visible(&Target::css(r#"textarea[placeholder*="Enter meeting description"]"#));
    page.set_visible(&Target::css(r#"input[placeholder*="invite"]"#));
    page
}

#[tokio::test]
async fn stream_details_form_is_filled_in_order() {
    let page = scripted_stream_form();
    let data = GoLiveData::default();
    let go_live = GoLivePage::new(&page, fast_timeouts());

    go_live.goto_dashboard("https://ngage.ngenux.app/dashboard").await.unwrap();
    go_live.go_to_go_live().await.unwrap();
    go_live
        .fill_stream_details(&data.stream_title, &data.stream_description, &data.invite_email)
        .await
        .unwrap();
    go_live.choose_start_option(false).await.unwrap();
    go_live.start_stream().await.unwrap();

    let fills = page.fills();
    assert_eq!(fills.len(), 3);
    assert_eq!(fills[0].1, data.stream_title);
    assert_eq!(fills[1].1, data.stream_description);
    assert_eq!(fills[2].1, data.invite_email);
    assert_eq!(page.presses(), vec![(
        r#"css=input[placeholder*="invite"]"#.to_string(),
        "Enter".to_string()
    )]);

    let clicks = page.clicks();
    assert!(clicks.iter().any(|c| c == "text=Start Immediately"));
    assert!(clicks.iter().any(|c| c == "text=Start Now"));
}

#[tokio::test]
async fn title_candidates_fall_back_to_the_alternate_placeholder() {
    let page = FakePage::new();
    page.set_visible(&Target::css(r#"input[placeholder="Title"]"#));
    page.set_visible(&Target::css(r#"textarea[placeholder*="Enter meeting description"]"#));
    page.set_visible(&Target::css(r#"input[placeholder*="invite"]"#));

    let go_live = GoLivePage::new(&page, fast_timeouts());
    go_live.fill_stream_details("t", "d", "i@example.com").await.unwrap();

    assert_eq!(page.fills()[0].0, r#"css=input[placeholder="Title"]"#);
}

#[tokio::test]
async fn stop_stream_uses_the_first_present_end_control() {
    let page = FakePage::new();
    page.set_visible(&Target::css(r#"button[aria-label*="End"]"#));

    let go_live = GoLivePage::new(&page, fast_timeouts());
    assert!(go_live.stop_stream().await.unwrap());
    assert_eq!(page.clicks(), vec![r#"css=button[aria-label*="End"]"#.to_string()]);
}

#[tokio::test]
async fn stop_stream_falls_back_to_later_end_control_variants() {
    // Only the data-testid variant exists in this layout.
    let page = FakePage::new();
    page.set_visible(&Target::css(r#"[data-testid="leave-call"]"#));

    let go_live = GoLivePage::new(&page, fast_timeouts());
    assert!(go_live.stop_stream().await.unwrap());
    assert_eq!(page.clicks(), vec![r#"css=[data-testid="leave-call"]"#.to_string()]);
}

#[tokio::test]
async fn missing_end_control_is_a_soft_miss_with_escape_fallback() {
    let page = FakePage::new();
    let go_live = GoLivePage::new(&page, fast_timeouts());

    assert!(!go_live.stop_stream().await.unwrap());
    assert!(page.clicks().is_empty());
    // With no end control anywhere, Escape is sent to dismiss whatever
    // might be covering it.
    assert_eq!(page.presses(), vec![("css=body".to_string(), "Escape".to_string())]);
}

#[tokio::test]
async fn settings_toggles_report_absence_instead_of_failing() {
    let page = FakePage::new();
    page.set_visible(&Target::text("Stream Settings"));
    page.set_visible(&Target::css(r#"button#record[role="switch"]"#));

    let go_live = GoLivePage::new(&page, fast_timeouts());
    go_live.expand_stream_settings().await.unwrap();
    assert!(go_live.toggle_record().await.unwrap());
    assert!(!go_live.toggle_allow_broadcast().await.unwrap());
    go_live.collapse_stream_settings().await.unwrap();
}
