use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{DispatchError, NotificationDispatcher};
use crate::models::OutboundNotification;

/// Sends through every configured channel, in order.
///
/// A failing channel does not stop later ones; the first error is returned
/// once all channels have been tried.
#[derive(Clone, Default)]
pub struct FanoutDispatcher {
    channels: Vec<Arc<dyn NotificationDispatcher>>,
}

impl FanoutDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: Arc<dyn NotificationDispatcher>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.channel()).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for FanoutDispatcher {
    async fn send(&self, notification: &OutboundNotification) -> Result<(), DispatchError> {
        let mut first_error = None;
        for channel in &self.channels {
            if let Err(err) = channel.send(notification).await {
                warn!(
                    "Channel {} failed for application {}: {err}",
                    channel.channel(),
                    notification.application_id
                );
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn channel(&self) -> &'static str {
        "fanout"
    }
}
