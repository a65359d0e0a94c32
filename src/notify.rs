//! Webhook delivery
//!
//! Delivery is fire-and-forget: outcomes are logged, failures are swallowed,
//! nothing is retried or queued, and callers must not rely on messages
//! arriving in submission order. The trait seam exists so tests can capture
//! deliveries without a network.

use std::time::Duration;

use log::{error, info};
use serde::Serialize;

/// Timeout for one webhook call
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers an extracted (subject, display body) pair to the notification
/// channel.
pub trait Notifier: Send + Sync {
    /// Deliver one message. Must not fail: implementations log problems and
    /// return.
    fn deliver(&self, subject: &str, html: &str);
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    msgtype: &'static str,
    html: HtmlContent<'a>,
}

#[derive(Serialize)]
struct HtmlContent<'a> {
    title: &'a str,
    content: &'a str,
}

/// Posts extracted content as JSON to a fixed webhook URL
pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    /// Create a notifier for the given webhook URL
    pub fn new(url: String) -> Self {
        Self {
            url,
            agent: ureq::AgentBuilder::new().timeout(DELIVERY_TIMEOUT).build(),
        }
    }

    fn payload<'a>(subject: &'a str, html: &'a str) -> WebhookPayload<'a> {
        WebhookPayload {
            msgtype: "html",
            html: HtmlContent {
                title: subject,
                content: html,
            },
        }
    }
}

impl Notifier for WebhookNotifier {
    fn deliver(&self, subject: &str, html: &str) {
        match self.agent.post(&self.url).send_json(Self::payload(subject, html)) {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().unwrap_or_default();
                info!("webhook status={status} subject={subject:?} response={body}");
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                error!("webhook rejected ({code}) subject={subject:?} response={body}");
            }
            Err(e) => {
                error!("webhook send failed: {e}");
            }
        }
    }
}
