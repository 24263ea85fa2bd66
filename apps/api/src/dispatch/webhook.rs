use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{DispatchError, NotificationDispatcher};
use crate::models::{NotificationCategory, OutboundNotification, Recipient};

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    recipient: Recipient,
    category: NotificationCategory,
    category_code: i16,
    title: &'a str,
    content: &'a str,
    application_id: i64,
}

/// Posts notifications as JSON to an external gateway (email/SMS relays).
#[derive(Clone)]
pub struct WebhookChannel {
    client: Client,
    url: String,
}

impl WebhookChannel {
    pub fn new(url: String, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookChannel {
    async fn send(&self, notification: &OutboundNotification) -> Result<(), DispatchError> {
        let payload = WebhookPayload {
            recipient: notification.recipient,
            category: notification.category,
            category_code: notification.category.code(),
            title: &notification.title,
            content: &notification.content,
            application_id: notification.application_id,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!("Webhook accepted notification for application {}", notification.application_id);
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "webhook"
    }
}
