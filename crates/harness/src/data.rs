//! Scenario data for the streaming and classroom flows.
//!
//! Defaults are overridable through the environment so the same scenarios
//! run against staging and production tenants without code changes.

use crate::config::env_or;

/// Inputs for the Go Live streaming scenarios.
#[derive(Debug, Clone)]
pub struct GoLiveData {
    pub stream_title: String,
    pub stream_description: String,
    pub invite_email: String,
    /// Error toast shown when the invited participant does not exist.
    pub error_text: String,
    /// Heading on the identity provider's returning-user page.
    pub welcome_back_heading: String,
}

impl Default for GoLiveData {
    fn default() -> Self {
        Self {
            stream_title: "Test Meeting".to_string(),
            stream_description: "Automated test meeting.".to_string(),
            invite_email: env_or("INVITE_EMAIL", "testuser@example.com"),
            error_text: "Participant not found".to_string(),
            welcome_back_heading: "Welcome Back".to_string(),
        }
    }
}

/// Inputs for the virtual classroom scenarios.
#[derive(Debug, Clone)]
pub struct StartClassData {
    pub class_title: String,
    pub class_description: String,
    pub invite_email: String,
    pub chat_message: String,
    /// Upper bound for chat round-trip measurements, in milliseconds.
    pub latency_threshold_ms: u64,
}

impl Default for StartClassData {
    fn default() -> Self {
        Self {
            class_title: "Test Real-Time Class".to_string(),
            class_description: "Automated test class for real-time interaction.".to_string(),
            invite_email: env_or("INVITE_EMAIL", "participant@example.com"),
            chat_message: "Hello, this is a test message in real-time chat".to_string(),
            latency_threshold_ms: 300,
        }
    }
}

/// Inputs for the in-class poll scenario.
#[derive(Debug, Clone)]
pub struct PollData {
    pub question: String,
    pub options: Vec<String>,
}

impl Default for PollData {
    fn default() -> Self {
        Self {
            question: "Which fruit do you like most?".to_string(),
            options: vec!["Apple".to_string(), "Banana".to_string()],
        }
    }
}
