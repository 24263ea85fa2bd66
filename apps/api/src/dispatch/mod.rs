//! Notification delivery. The lifecycle engine hands over rendered messages;
//! which channels they travel through is decided here.

pub mod fanout;
pub mod in_app;
pub mod memory;
pub mod webhook;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::OutboundNotification;

pub use fanout::FanoutDispatcher;
pub use in_app::InAppChannel;
pub use memory::RecordingDispatcher;
pub use webhook::WebhookChannel;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("in-app delivery failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected notification (status {status})")]
    Rejected { status: u16 },

    #[error("channel unavailable: {0}")]
    Unavailable(String),
}

/// A delivery channel, or a composition of channels.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, notification: &OutboundNotification) -> Result<(), DispatchError>;

    /// Short name used in logs.
    fn channel(&self) -> &'static str;
}
