//! Virtual classroom page.

use tracing::warn;

use crate::config::Timeouts;
use crate::driver::{AppPage, Target};
use crate::error::Result;

use super::{click_first, fill_first};

/// Locators for the classroom flow.
#[derive(Debug, Clone)]
pub struct StartClassUi {
    pub start_class_entry: Target,
    pub title_inputs: Vec<Target>,
    pub description_inputs: Vec<Target>,
    pub invite_inputs: Vec<Target>,
    pub start_buttons: Vec<Target>,
    pub class_settings: Target,
    /// Feature switches toggled during setup, in click order.
    pub feature_switches: Vec<Target>,
    pub class_active: Target,
    pub chat_inputs: Vec<Target>,
    pub send_chat_buttons: Vec<Target>,
    pub polls_tab: Target,
    pub create_poll_button: Target,
    pub poll_question_inputs: Vec<Target>,
    pub publish_poll_button: Target,
    pub end_controls: Vec<Target>,
    pub confirm_buttons: Vec<Target>,
}

impl Default for StartClassUi {
    fn default() -> Self {
        Self {
            start_class_entry: Target::text("Start a Class"),
            title_inputs: vec![
                Target::css(r#"input[placeholder*="class title"]"#),
                Target::css(r#"input[placeholder*="Class Title"]"#),
            ],
            description_inputs: vec![
                Target::css(r#"textarea[placeholder*="class description"]"#),
                Target::css(r#"textarea[placeholder*="Description"]"#),
            ],
            invite_inputs: vec![
                Target::css(r#"input[placeholder*="invite"]"#),
                Target::css(r#"input[placeholder*="email"]"#),
            ],
            start_buttons: vec![Target::text("Start Class"), Target::text("Start Now")],
            class_settings: Target::text("Class Settings"),
            feature_switches: vec![
                Target::css(r#"button#chat[role="switch"]"#),
                Target::css(r#"button#whiteboard[role="switch"]"#),
                Target::css(r#"button#polls[role="switch"]"#),
                Target::css(r#"button#recording[role="switch"]"#),
            ],
            class_active: Target::text("Class is Live"),
            chat_inputs: vec![
                Target::css(r#"input[placeholder*="message"]"#),
                Target::css(r#"textarea[placeholder*="message"]"#),
            ],
            send_chat_buttons: vec![
                Target::css(r#"button[aria-label*="Send"]"#),
                Target::text("Send"),
            ],
            polls_tab: Target::text("Polls"),
            create_poll_button: Target::text("Create Poll"),
            poll_question_inputs: vec![
                Target::css(r#"input[placeholder*="poll question"]"#),
                Target::css(r#"textarea[placeholder*="question"]"#),
            ],
            publish_poll_button: Target::text("Publish Poll"),
            end_controls: vec![
                Target::text("End Class"),
                Target::css(r#"button[aria-label*="End"]"#),
            ],
            confirm_buttons: vec![Target::text("Confirm"), Target::text("Yes")],
        }
    }
}

/// Intent-level operations for running a class session.
pub struct StartClassPage<'a> {
    page: &'a dyn AppPage,
    timeouts: Timeouts,
    ui: StartClassUi,
}

impl<'a> StartClassPage<'a> {
    pub fn new(page: &'a dyn AppPage, timeouts: Timeouts) -> Self {
        Self {
            page,
            timeouts,
            ui: StartClassUi::default(),
        }
    }

    /// Opens the dashboard and waits for the class entry to render.
    pub async fn goto_dashboard(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        self.page
            .wait_for_target(
                &self.ui.start_class_entry,
                self.timeouts.scaled(self.timeouts.primary),
            )
            .await
    }

    pub async fn go_to_start_class(&self) -> Result<()> {
        self.page.click(&self.ui.start_class_entry).await
    }

    /// Fills whichever setup fields the current layout shows; the invite
    /// is committed with Enter.
    pub async fn setup_class(&self, title: &str, description: &str, invite: &str) -> Result<()> {
        let timeout = self.timeouts.secondary;
        fill_first(self.page, &self.ui.title_inputs, title, timeout).await?;
        if let Some(field) = super::first_visible(self.page, &self.ui.description_inputs, timeout).await? {
            self.page.fill(field, description).await?;
        }
        if let Some(field) = super::first_visible(self.page, &self.ui.invite_inputs, timeout).await? {
            self.page.fill(field, invite).await?;
            self.page.press(field, "Enter").await?;
        }
        Ok(())
    }

    /// Enables chat, whiteboard, polls and recording where the switches
    /// exist. Returns how many switches were flipped.
    pub async fn enable_class_features(&self) -> Result<usize> {
        click_first(
            self.page,
            std::slice::from_ref(&self.ui.class_settings),
            self.timeouts.secondary,
        )
        .await?;

        let mut flipped = 0;
        for switch in &self.ui.feature_switches {
            if click_first(self.page, std::slice::from_ref(switch), self.timeouts.secondary).await? {
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    /// Starts the class and waits for the live indicator.
    pub async fn start_class(&self) -> Result<()> {
        click_first(
            self.page,
            &self.ui.start_buttons,
            self.timeouts.scaled(self.timeouts.secondary),
        )
        .await?;
        self.page
            .wait_for_target(
                &self.ui.class_active,
                self.timeouts.scaled(self.timeouts.primary),
            )
            .await
    }

    pub async fn send_chat_message(&self, message: &str) -> Result<()> {
        fill_first(self.page, &self.ui.chat_inputs, message, self.timeouts.secondary).await?;
        if !click_first(self.page, &self.ui.send_chat_buttons, self.timeouts.secondary).await? {
            // Some layouts submit on Enter only.
            if let Some(field) =
                super::first_visible(self.page, &self.ui.chat_inputs, self.timeouts.secondary).await?
            {
                self.page.press(field, "Enter").await?;
            }
        }
        Ok(())
    }

    /// Creates and publishes a poll with the given question and options.
    pub async fn create_poll(&self, question: &str, options: &[String]) -> Result<()> {
        self.page.click(&self.ui.polls_tab).await?;
        self.page.click(&self.ui.create_poll_button).await?;
        fill_first(
            self.page,
            &self.ui.poll_question_inputs,
            question,
            self.timeouts.secondary,
        )
        .await?;

        for (i, option) in options.iter().enumerate() {
            let slot = Target::css(format!(
                r#"input[placeholder*="option"]:nth-child({})"#,
                i + 1
            ));
            if self.page.is_visible(&slot, self.timeouts.secondary).await? {
                self.page.fill(&slot, option).await?;
            }
        }

        self.page.click(&self.ui.publish_poll_button).await
    }

    /// Ends the class, confirming the dialog when one appears. A missing
    /// end control is reported, not fatal.
    pub async fn end_class(&self) -> Result<bool> {
        let ended = click_first(
            self.page,
            &self.ui.end_controls,
            self.timeouts.scaled(self.timeouts.secondary),
        )
        .await?;
        if !ended {
            warn!(target: "golive::pages", "no end-class control found");
            return Ok(false);
        }
        click_first(self.page, &self.ui.confirm_buttons, self.timeouts.secondary).await?;
        Ok(true)
    }
}
