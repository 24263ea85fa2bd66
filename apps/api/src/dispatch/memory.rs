use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DispatchError, NotificationDispatcher};
use crate::models::OutboundNotification;

/// Keeps every notification it is given. Can be told to fail instead.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<OutboundNotification>>,
    failing: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let dispatcher = Self::default();
        dispatcher.set_failing(true);
        dispatcher
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutboundNotification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &OutboundNotification) -> Result<(), DispatchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DispatchError::Unavailable("recording dispatcher set to fail".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| DispatchError::Unavailable("recorder poisoned".to_string()))?
            .push(notification.clone());
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "memory"
    }
}
