// Delivery of composed messages.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::model::AlertMessage;
use crate::core::error::{Error, Result};

pub const WEBHOOK_USERNAME: &str = "CryptoBlades Stamina Notifier";
const EMBED_COLOR: u32 = 0x74829d;

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver one message. Callers keep descriptions within the length limit.
    async fn send(&self, message: &AlertMessage) -> Result<()>;
}

#[derive(Serialize)]
struct Embed<'a> {
    color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    description: &'a str,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    username: &'a str,
    embeds: [Embed<'a>; 1],
}

fn payload(message: &AlertMessage) -> WebhookPayload<'_> {
    WebhookPayload {
        username: WEBHOOK_USERNAME,
        embeds: [Embed {
            color: EMBED_COLOR,
            title: message.title.as_deref(),
            description: &message.description,
        }],
    }
}

/// Posts each message as a single embed to a Discord webhook.
pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl NotificationTransport for DiscordWebhook {
    async fn send(&self, message: &AlertMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&payload(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteCall(format!(
                "Discord webhook returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let message = AlertMessage {
            title: Some("Characters reached 160 stamina".to_string()),
            description: "`main`\n• 1st (170)\n\n".to_string(),
        };
        let json = serde_json::to_value(payload(&message)).unwrap();
        assert_eq!(json["username"], WEBHOOK_USERNAME);
        assert_eq!(json["embeds"][0]["color"], 0x74829d);
        assert_eq!(json["embeds"][0]["title"], "Characters reached 160 stamina");
        assert_eq!(json["embeds"][0]["description"], "`main`\n• 1st (170)\n\n");
    }

    #[test]
    fn test_payload_without_title() {
        let message = AlertMessage {
            title: None,
            description: "short".to_string(),
        };
        let json = serde_json::to_value(payload(&message)).unwrap();
        assert!(json["embeds"][0].get("title").is_none());
    }
}
