//! Notification copy for status transitions.
//!
//! Drafting is pure: given the application, the (possibly unresolved) job
//! and the status being entered, it returns the messages to send. Delivery
//! happens afterwards and cannot influence the transition.

use serde::{Deserialize, Serialize};

use crate::jobs::JobSummary;
use crate::lifecycle::status::ApplicationStatus;
use crate::models::{Application, NotificationCategory, OutboundNotification, Recipient};

/// Used in copy when the job cannot be resolved.
pub const FALLBACK_JOB_NAME: &str = "this position";

/// Every message the pipeline knows how to send, with its own payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    InterviewInvitation { job_name: String },
    CandidateAwaitingInterview { job_name: String },
    InterviewPassed { job_name: String },
    CandidatePassedInterview { job_name: String },
    InterviewFailed { job_name: String },
    OfferExtended { job_name: String },
    ApplicationAccepted { job_name: String },
    CandidateHired { job_name: String },
    ApplicationRejected { job_name: String, reason: Option<String> },
    StatusChanged { status: ApplicationStatus },
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::InterviewInvitation { .. } => "Interview invitation",
            NotificationKind::CandidateAwaitingInterview { .. } => "Candidate moved to interview",
            NotificationKind::InterviewPassed { .. } => "Interview result",
            NotificationKind::CandidatePassedInterview { .. } => "Interview passed",
            NotificationKind::InterviewFailed { .. } => "Interview result",
            NotificationKind::OfferExtended { .. } => "Offer received",
            NotificationKind::ApplicationAccepted { .. } => "Application accepted",
            NotificationKind::CandidateHired { .. } => "Candidate hired",
            NotificationKind::ApplicationRejected { .. } => "Application update",
            NotificationKind::StatusChanged { .. } => "Application status updated",
        }
    }

    pub fn content(&self) -> String {
        match self {
            NotificationKind::InterviewInvitation { job_name } => format!(
                "Your application for {job_name} passed initial screening. Please wait for the interview schedule."
            ),
            NotificationKind::CandidateAwaitingInterview { job_name } => format!(
                "A candidate for {job_name} has moved to the interview stage. Please arrange the interview."
            ),
            NotificationKind::InterviewPassed { job_name } => {
                format!("Congratulations! You passed the interview for {job_name}.")
            }
            NotificationKind::CandidatePassedInterview { job_name } => format!(
                "A candidate for {job_name} passed the interview. Please follow up on the next steps."
            ),
            NotificationKind::InterviewFailed { job_name } => format!(
                "Unfortunately your interview for {job_name} was not successful. You are welcome to apply for other positions."
            ),
            NotificationKind::OfferExtended { job_name } => format!(
                "Congratulations! You have received an offer for {job_name}. Please review and confirm."
            ),
            NotificationKind::ApplicationAccepted { job_name } => {
                format!("Your application for {job_name} has been accepted.")
            }
            NotificationKind::CandidateHired { job_name } => {
                format!("A candidate has been hired for {job_name}.")
            }
            NotificationKind::ApplicationRejected { job_name, reason } => match reason {
                Some(reason) => format!(
                    "Your application for {job_name} was not successful. Reason: {reason}"
                ),
                None => format!("Your application for {job_name} was not successful."),
            },
            NotificationKind::StatusChanged { status } => {
                format!("Your application status has changed to {}.", status.label())
            }
        }
    }

    pub fn category(&self) -> NotificationCategory {
        match self {
            NotificationKind::InterviewInvitation { .. } => NotificationCategory::Interview,
            _ => NotificationCategory::StatusUpdate,
        }
    }
}

/// A message addressed to one side of the pipeline, not yet rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub recipient: Recipient,
    pub kind: NotificationKind,
}

impl NotificationDraft {
    pub fn render(&self, application_id: i64) -> OutboundNotification {
        OutboundNotification {
            recipient: self.recipient,
            title: self.kind.title().to_string(),
            content: self.kind.content(),
            category: self.kind.category(),
            application_id,
        }
    }
}

/// Drafts for entering `target`. The applicant draft always comes first.
///
/// Company drafts go to the application's own `company_id`, so an
/// unresolved job only changes the wording.
pub fn drafts_for_transition(
    application: &Application,
    job: Option<&JobSummary>,
    target: ApplicationStatus,
) -> Vec<NotificationDraft> {
    let job_name = job
        .map(|job| job.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_JOB_NAME)
        .to_string();
    let applicant = Recipient::Applicant(application.applicant_id);
    let company = Recipient::Company(application.company_id);

    let draft = |recipient, kind| NotificationDraft { recipient, kind };

    match target {
        ApplicationStatus::AwaitingInterview => vec![
            draft(
                applicant,
                NotificationKind::InterviewInvitation {
                    job_name: job_name.clone(),
                },
            ),
            draft(
                company,
                NotificationKind::CandidateAwaitingInterview { job_name },
            ),
        ],
        ApplicationStatus::InterviewPassed => vec![
            draft(
                applicant,
                NotificationKind::InterviewPassed {
                    job_name: job_name.clone(),
                },
            ),
            draft(company, NotificationKind::CandidatePassedInterview { job_name }),
        ],
        ApplicationStatus::InterviewFailed => {
            vec![draft(applicant, NotificationKind::InterviewFailed { job_name })]
        }
        ApplicationStatus::OfferSent => {
            vec![draft(applicant, NotificationKind::OfferExtended { job_name })]
        }
        ApplicationStatus::Accepted => vec![
            draft(
                applicant,
                NotificationKind::ApplicationAccepted {
                    job_name: job_name.clone(),
                },
            ),
            draft(company, NotificationKind::CandidateHired { job_name }),
        ],
        ApplicationStatus::Rejected => {
            let reason = Some(application.rejection_reason.trim())
                .filter(|reason| !reason.is_empty())
                .map(str::to_string);
            vec![draft(
                applicant,
                NotificationKind::ApplicationRejected { job_name, reason },
            )]
        }
        status => vec![draft(applicant, NotificationKind::StatusChanged { status })],
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::NewApplication;

    fn application() -> Application {
        NewApplication::pending(3, 40, 7, 9, Utc::now()).into_application(11)
    }

    fn job(name: &str) -> JobSummary {
        JobSummary {
            id: 3,
            name: name.to_string(),
            company_id: 40,
            status: crate::jobs::JOB_STATUS_OPEN,
            expires_at: None,
            deleted: false,
        }
    }

    #[test]
    fn test_interview_stage_notifies_both_sides() {
        let job = job("Rust Engineer");
        let drafts =
            drafts_for_transition(&application(), Some(&job), ApplicationStatus::AwaitingInterview);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].recipient, Recipient::Applicant(7));
        assert_eq!(drafts[1].recipient, Recipient::Company(40));

        let rendered = drafts[0].render(11);
        assert_eq!(rendered.title, "Interview invitation");
        assert!(rendered.content.contains("Rust Engineer"));
        assert_eq!(rendered.category, NotificationCategory::Interview);
        assert_eq!(rendered.application_id, 11);
    }

    #[test]
    fn test_offer_notifies_applicant_only() {
        let drafts =
            drafts_for_transition(&application(), Some(&job("SRE")), ApplicationStatus::OfferSent);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].recipient, Recipient::Applicant(7));
        assert_eq!(drafts[0].render(11).title, "Offer received");
    }

    #[test]
    fn test_fallback_is_generic_status_change() {
        let drafts =
            drafts_for_transition(&application(), Some(&job("SRE")), ApplicationStatus::InProgress);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].recipient, Recipient::Applicant(7));
        let rendered = drafts[0].render(11);
        assert_eq!(rendered.title, "Application status updated");
        assert!(rendered.content.contains("In Progress"));
        assert_eq!(rendered.category, NotificationCategory::StatusUpdate);
    }

    #[test]
    fn test_unresolved_job_uses_fallback_name() {
        let drafts = drafts_for_transition(&application(), None, ApplicationStatus::InterviewPassed);
        assert_eq!(drafts.len(), 2);
        assert!(drafts[0].render(11).content.contains(FALLBACK_JOB_NAME));
        // Company copy is still addressed from the application itself.
        assert_eq!(drafts[1].recipient, Recipient::Company(40));
    }

    #[test]
    fn test_blank_job_name_uses_fallback() {
        let drafts =
            drafts_for_transition(&application(), Some(&job("  ")), ApplicationStatus::OfferSent);
        assert!(drafts[0].render(11).content.contains(FALLBACK_JOB_NAME));
    }

    #[test]
    fn test_rejection_quotes_reason() {
        let mut app = application();
        app.rejection_reason = "position filled".to_string();
        let drafts = drafts_for_transition(&app, Some(&job("SRE")), ApplicationStatus::Rejected);
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].render(11).content.contains("position filled"));

        app.rejection_reason.clear();
        let drafts = drafts_for_transition(&app, Some(&job("SRE")), ApplicationStatus::Rejected);
        assert!(!drafts[0].render(11).content.contains("Reason"));
    }

    #[test]
    fn test_every_status_yields_one_or_two_drafts() {
        let app = application();
        for status in ApplicationStatus::ALL {
            let drafts = drafts_for_transition(&app, None, status);
            assert!((1..=2).contains(&drafts.len()), "{status:?}");
            assert_eq!(drafts[0].recipient, Recipient::Applicant(7));
        }
    }
}
