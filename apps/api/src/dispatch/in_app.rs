use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{DispatchError, NotificationDispatcher};
use crate::models::OutboundNotification;

/// Writes an unread row into the recipient's inbox.
#[derive(Clone)]
pub struct InAppChannel {
    pool: PgPool,
}

impl InAppChannel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationDispatcher for InAppChannel {
    async fn send(&self, notification: &OutboundNotification) -> Result<(), DispatchError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, recipient_id, audience, category, title, content, application_id, is_read)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            "#,
        )
        .bind(id)
        .bind(notification.recipient.target_id())
        .bind(notification.recipient.audience())
        .bind(notification.category.code())
        .bind(&notification.title)
        .bind(&notification.content)
        .bind(notification.application_id)
        .execute(&self.pool)
        .await?;

        debug!(
            "Stored in-app notification {id} for {} {}",
            notification.recipient.audience(),
            notification.recipient.target_id()
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "in_app"
    }
}
