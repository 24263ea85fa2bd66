use serde::{Deserialize, Serialize};

use crate::lifecycle::error::LifecycleError;

/// Every stage an application can occupy in the hiring pipeline.
///
/// The numeric code is what gets persisted in `job_applications.status` and
/// what clients send when requesting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    InProgress,
    Accepted,
    Rejected,
    Withdrawn,
    AwaitingInterview,
    InterviewPassed,
    InterviewFailed,
    OfferSent,
    OfferAccepted,
    OfferDeclined,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 11] = [
        ApplicationStatus::Pending,
        ApplicationStatus::InProgress,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::AwaitingInterview,
        ApplicationStatus::InterviewPassed,
        ApplicationStatus::InterviewFailed,
        ApplicationStatus::OfferSent,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::OfferDeclined,
    ];

    pub const fn code(self) -> i16 {
        match self {
            ApplicationStatus::Pending => 1,
            ApplicationStatus::InProgress => 2,
            ApplicationStatus::Accepted => 3,
            ApplicationStatus::Rejected => 4,
            ApplicationStatus::Withdrawn => 5,
            ApplicationStatus::AwaitingInterview => 6,
            ApplicationStatus::InterviewPassed => 7,
            ApplicationStatus::InterviewFailed => 8,
            ApplicationStatus::OfferSent => 9,
            ApplicationStatus::OfferAccepted => 10,
            ApplicationStatus::OfferDeclined => 11,
        }
    }

    /// Parses a wire/storage code. Unknown codes are `InvalidStatus`.
    pub fn from_code(code: i16) -> Result<Self, LifecycleError> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(LifecycleError::InvalidStatus(code))
    }

    /// Human-readable text mirrored into `progress_label`.
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::InProgress => "In Progress",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
            ApplicationStatus::AwaitingInterview => "Awaiting Interview",
            ApplicationStatus::InterviewPassed => "Interview Passed",
            ApplicationStatus::InterviewFailed => "Interview Failed",
            ApplicationStatus::OfferSent => "Offer Sent",
            ApplicationStatus::OfferAccepted => "Offer Accepted",
            ApplicationStatus::OfferDeclined => "Offer Declined",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// States in which a rejection reason is kept on the record.
    pub const fn is_rejection(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected
                | ApplicationStatus::InterviewFailed
                | ApplicationStatus::OfferDeclined
        )
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
