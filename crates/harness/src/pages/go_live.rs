//! Go Live streaming page.

use tracing::{debug, warn};

use crate::config::Timeouts;
use crate::driver::{AppPage, Target};
use crate::error::Result;

use super::{click_first, fill_first};

/// Locators for the streaming flow.
#[derive(Debug, Clone)]
pub struct GoLiveUi {
    pub go_live_entry: Target,
    pub stream_settings: Target,
    pub record_switch: Target,
    pub allow_broadcast_switch: Target,
    pub camera_preview: Target,
    pub start_now_radio: Target,
    pub schedule_radio: Target,
    pub start_button: Target,
    pub title_inputs: Vec<Target>,
    pub description_input: Target,
    pub invite_input: Target,
    /// End controls vary between layout revisions; checked in order.
    pub end_controls: Vec<Target>,
    pub profile_menu: Target,
    pub logout_entry: Target,
}

impl Default for GoLiveUi {
    fn default() -> Self {
        Self {
            go_live_entry: Target::text("Go Live"),
            stream_settings: Target::text("Stream Settings"),
            record_switch: Target::css(r#"button#record[role="switch"]"#),
            allow_broadcast_switch: Target::css(r#"button[role="switch"]#allow-broadcast"#),
            camera_preview: Target::text("Click to turn on camera"),
            start_now_radio: Target::text("Start Immediately"),
            schedule_radio: Target::text("Schedule for Later"),
            start_button: Target::text("Start Now"),
            title_inputs: vec![
                Target::css(r#"input[placeholder="Enter stream title"]"#),
                Target::css(r#"input[placeholder="Title"]"#),
            ],
            description_input: Target::css(r#"textarea[placeholder*="Enter meeting description"]"#),
            invite_input: Target::css(r#"input[placeholder*="invite"]"#),
            end_controls: vec![
                Target::aria("End call"),
                Target::aria("End stream"),
                Target::aria("Leave"),
                Target::css(r#"button[aria-label*="End"]"#),
                Target::text("End Stream"),
                Target::text("End"),
                Target::text("Stop"),
                Target::text("Leave"),
                Target::css(r#"[data-testid="end-stream"]"#),
                Target::css(r#"[data-testid="stop-stream"]"#),
                Target::css(r#"[data-testid="leave-call"]"#),
                Target::css(".end-button"),
                Target::css(".stop-button"),
                Target::css(".leave-button"),
            ],
            profile_menu: Target::css(r#"[data-testid="profile-menu"]"#),
            logout_entry: Target::text("Logout"),
        }
    }
}

/// Intent-level operations for starting and stopping a live stream.
pub struct GoLivePage<'a> {
    page: &'a dyn AppPage,
    timeouts: Timeouts,
    ui: GoLiveUi,
}

impl<'a> GoLivePage<'a> {
    pub fn new(page: &'a dyn AppPage, timeouts: Timeouts) -> Self {
        Self {
            page,
            timeouts,
            ui: GoLiveUi::default(),
        }
    }

    pub fn with_ui(mut self, ui: GoLiveUi) -> Self {
        self.ui = ui;
        self
    }

    /// Opens the dashboard and waits for the Go Live entry to render.
    pub async fn goto_dashboard(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        self.page
            .wait_for_target(&self.ui.go_live_entry, self.timeouts.scaled(self.timeouts.primary))
            .await
    }

    pub async fn go_to_go_live(&self) -> Result<()> {
        self.page.click(&self.ui.go_live_entry).await
    }

    pub async fn expand_stream_settings(&self) -> Result<()> {
        self.page.click(&self.ui.stream_settings).await
    }

    /// Same control collapses the panel.
    pub async fn collapse_stream_settings(&self) -> Result<()> {
        self.page.click(&self.ui.stream_settings).await
    }

    /// Flips the recording switch. `Ok(false)` when the switch is absent
    /// in the current layout.
    pub async fn toggle_record(&self) -> Result<bool> {
        click_first(
            self.page,
            std::slice::from_ref(&self.ui.record_switch),
            self.timeouts.secondary,
        )
        .await
    }

    /// Flips the broadcast-permission switch; absent on some tenants.
    pub async fn toggle_allow_broadcast(&self) -> Result<bool> {
        click_first(
            self.page,
            std::slice::from_ref(&self.ui.allow_broadcast_switch),
            self.timeouts.secondary,
        )
        .await
    }

    pub async fn interact_camera_preview(&self) -> Result<bool> {
        click_first(
            self.page,
            std::slice::from_ref(&self.ui.camera_preview),
            self.timeouts.secondary,
        )
        .await
    }

    pub async fn choose_start_option(&self, schedule: bool) -> Result<()> {
        let radio = if schedule {
            &self.ui.schedule_radio
        } else {
            &self.ui.start_now_radio
        };
        self.page.click(radio).await
    }

    /// Fills title, description and invite email, committing the invite
    /// with Enter.
    pub async fn fill_stream_details(
        &self,
        title: &str,
        description: &str,
        invite: &str,
    ) -> Result<()> {
        let timeout = self.timeouts.scaled(self.timeouts.secondary);
        fill_first(self.page, &self.ui.title_inputs, title, timeout).await?;
        self.page.fill(&self.ui.description_input, description).await?;
        self.page.fill(&self.ui.invite_input, invite).await?;
        self.page.press(&self.ui.invite_input, "Enter").await
    }

    pub async fn start_stream(&self) -> Result<()> {
        debug!(target: "golive::pages", "starting stream");
        self.page.click(&self.ui.start_button).await
    }

    /// Ends the stream through the first end control that is present,
    /// falling back to Escape when none is.
    ///
    /// A missing end control is reported, not fatal: the stream may already
    /// have ended, and teardown must not mask the scenario's own verdict.
    /// The Escape press dismisses any modal that might cover the control.
    pub async fn stop_stream(&self) -> Result<bool> {
        let stopped = click_first(
            self.page,
            &self.ui.end_controls,
            self.timeouts.scaled(self.timeouts.secondary),
        )
        .await?;
        if !stopped {
            warn!(target: "golive::pages", "no end control found; sending Escape");
            self.page.press(&Target::css("body"), "Escape").await?;
        }
        Ok(stopped)
    }

    /// Logs out through the profile menu when it is present.
    pub async fn logout(&self) -> Result<bool> {
        let opened = click_first(
            self.page,
            std::slice::from_ref(&self.ui.profile_menu),
            self.timeouts.secondary,
        )
        .await?;
        if !opened {
            return Ok(false);
        }
        click_first(
            self.page,
            std::slice::from_ref(&self.ui.logout_entry),
            self.timeouts.secondary,
        )
        .await
    }
}
