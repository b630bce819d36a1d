//! Posts the suite verdict as a chat-ops MessageCard.

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use crate::summary::SuiteSummary;

const THEME_PASS: &str = "00FF00";
const THEME_FAIL: &str = "FF0000";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageCard {
    #[serde(rename = "@type")]
    card_type: &'static str,
    #[serde(rename = "@context")]
    context: &'static str,
    theme_color: &'static str,
    summary: String,
    sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Section {
    activity_title: String,
    facts: Vec<Fact>,
    markdown: bool,
}

#[derive(Debug, Serialize)]
struct Fact {
    name: &'static str,
    value: String,
}

fn build_card(summary: &SuiteSummary) -> MessageCard {
    let verdict = if summary.all_passed() {
        "✅ Passed"
    } else {
        "❌ Failed"
    };
    MessageCard {
        card_type: "MessageCard",
        context: "http://schema.org/extensions",
        theme_color: if summary.all_passed() {
            THEME_PASS
        } else {
            THEME_FAIL
        },
        summary: format!("Go Live E2E: {verdict}"),
        sections: vec![Section {
            activity_title: format!("Go Live E2E Test Results: {verdict}"),
            facts: vec![
                Fact {
                    name: "Total",
                    value: summary.total().to_string(),
                },
                Fact {
                    name: "Passed",
                    value: summary.passed.to_string(),
                },
                Fact {
                    name: "Failed",
                    value: summary.failed.to_string(),
                },
                Fact {
                    name: "Skipped",
                    value: summary.skipped.to_string(),
                },
            ],
            markdown: true,
        }],
    }
}

/// Fire-and-report: a webhook failure is the caller's error, never a
/// reason to rewrite the suite verdict.
pub async fn post_summary(webhook: &str, summary: &SuiteSummary) -> Result<()> {
    let card = build_card(summary);
    let response = reqwest::Client::new()
        .post(webhook)
        .json(&card)
        .send()
        .await?;

    if !response.status().is_success() {
        bail!("webhook rejected the card: {}", response.status());
    }
    info!(target: "golive", "summary card posted");
    Ok(())
}
