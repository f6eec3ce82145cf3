//! Delivery of change notifications to a chat webhook.

use std::io::Write;
use std::time::Duration;

use interpel_core::{format_message, ChangeRecord};
use serde::Serialize;
use tracing::{error, info};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure delivering a single message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook post failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("could not write message: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends one rendered message somewhere.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

// ── Mattermost-style incoming webhook ─────────────────────────────────────────

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
}

/// Posts `{"text", "username", "icon_emoji"}` to an incoming webhook.
pub struct WebhookNotifier {
    url: String,
    username: String,
    icon: String,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    pub fn new(url: &str, username: &str, icon: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(WEBHOOK_TIMEOUT))
            .build()
            .into();
        WebhookNotifier {
            url: url.to_string(),
            username: username.to_string(),
            icon: icon.to_string(),
            agent,
        }
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            text,
            username: &self.username,
            icon_emoji: &self.icon,
        };
        // Non-2xx statuses come back as errors.
        self.agent.post(&self.url).send_json(&payload)?;
        Ok(())
    }
}

// ── Dry run ───────────────────────────────────────────────────────────────────

/// Prints messages to stdout instead of posting them.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}

// ── Delivery ──────────────────────────────────────────────────────────────────

/// Outcome of [`deliver_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Send one message per change. A failed send is logged and does not stop
/// the remaining ones.
pub fn deliver_all(changes: &[ChangeRecord], notifier: &dyn Notifier) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    info!(count = changes.len(), "sending notifications");

    for change in changes {
        match notifier.send(&format_message(change)) {
            Ok(()) => {
                report.sent += 1;
                info!(inquiry = %change.key, "notification sent");
            }
            Err(e) => {
                report.failed += 1;
                error!(inquiry = %change.key, error = %e, "notification failed");
            }
        }
    }

    report
}
