//! Fire-and-forget webhook client

use std::time::Duration;

use guildlink_common::WebhookSettings;
use reqwest::Client;
use tracing::{debug, warn};

use super::payload::WebhookMessage;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook is disabled or has no url")]
    Inactive,

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook rejected the payload with status {0}")]
    Status(u16),
}

/// Shared HTTP client for webhook executions. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    client: Client,
}

impl WebhookSender {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new() -> Result<Self, WebhookError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed
    pub fn with_timeout(timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Deliver in the background. Failures are logged, never returned.
    ///
    /// Does nothing when the webhook is disabled or has a blank url.
    pub fn send(&self, settings: &WebhookSettings, message: WebhookMessage) {
        if !settings.is_active() {
            debug!("Webhook inactive, dropping message");
            return;
        }

        let sender = self.clone();
        let settings = settings.clone();
        tokio::spawn(async move {
            if let Err(e) = sender.deliver(&settings, message).await {
                warn!(
                    webhook = %url_suffix(&settings.url),
                    error = %e,
                    "Failed to deliver webhook"
                );
            }
        });
    }

    /// Deliver and wait for the response.
    ///
    /// The configured username and avatar fill in whatever the message
    /// leaves unset.
    ///
    /// # Errors
    /// Returns an error if the webhook is inactive, the request fails, or
    /// the platform answers with a non-success status
    pub async fn deliver(
        &self,
        settings: &WebhookSettings,
        mut message: WebhookMessage,
    ) -> Result<(), WebhookError> {
        if !settings.is_active() {
            return Err(WebhookError::Inactive);
        }

        if message.username.is_none() {
            message = message.with_identity(settings.username.as_deref(), None);
        }
        if message.avatar_url.is_none() {
            message = message.with_identity(None, settings.avatar_url.as_deref());
        }

        let response = self
            .client
            .post(settings.url.trim())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        debug!(webhook = %url_suffix(&settings.url), "Webhook delivered");
        Ok(())
    }
}

/// Webhook urls embed a secret token; only the tail is ever logged
fn url_suffix(url: &str) -> String {
    let chars: Vec<char> = url.trim().chars().collect();
    let start = chars.len().saturating_sub(6);
    format!("...{}", chars[start..].iter().collect::<String>())
}
