use serde::{Deserialize, Serialize};

/// Inbox category codes this service writes. Codes 1 (job apply) and 4
/// (system) belong to other producers on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    StatusUpdate,
    Interview,
}

impl NotificationCategory {
    pub const fn code(self) -> i16 {
        match self {
            NotificationCategory::StatusUpdate => 2,
            NotificationCategory::Interview => 3,
        }
    }
}

/// Which side of the pipeline a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    Applicant(i64),
    Company(i64),
}

impl Recipient {
    pub const fn target_id(self) -> i64 {
        match self {
            Recipient::Applicant(id) | Recipient::Company(id) => id,
        }
    }

    pub const fn audience(self) -> &'static str {
        match self {
            Recipient::Applicant(_) => "applicant",
            Recipient::Company(_) => "company",
        }
    }
}

/// Rendered message handed to a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNotification {
    pub recipient: Recipient,
    pub title: String,
    pub content: String,
    pub category: NotificationCategory,
    /// Application that triggered the message, for inbox deep links.
    pub application_id: i64,
}
