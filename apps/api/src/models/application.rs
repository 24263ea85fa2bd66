use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::lifecycle::ApplicationStatus;
use crate::store::StoreError;

/// One applicant's submission against one job.
///
/// Status, label and reason are read-only outside the crate; `StatusChange`
/// is the only thing that moves them, and always together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    /// Copied from the job when the application is created.
    pub company_id: i64,
    pub applicant_id: i64,
    pub resume_id: i64,
    pub(crate) status: ApplicationStatus,
    pub(crate) status_code: i16,
    pub(crate) progress_label: String,
    pub(crate) rejection_reason: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn status_code(&self) -> i16 {
        self.status_code
    }

    pub fn progress_label(&self) -> &str {
        &self.progress_label
    }

    pub fn rejection_reason(&self) -> &str {
        &self.rejection_reason
    }
}

/// Raw `job_applications` row.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub job_id: i64,
    pub company_id: i64,
    pub user_id: i64,
    pub resume_id: i64,
    pub status: i16,
    pub progress_label: String,
    pub rejection_reason: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::from_code(row.status).map_err(|_| {
            StoreError::Corrupt(format!(
                "application {} has unknown status code {}",
                row.id, row.status
            ))
        })?;
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            company_id: row.company_id,
            applicant_id: row.user_id,
            resume_id: row.resume_id,
            status,
            status_code: row.status,
            progress_label: row.progress_label,
            rejection_reason: row.rejection_reason,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insert payload. Only the lifecycle engine builds these, always in `Pending`.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub(crate) job_id: i64,
    pub(crate) company_id: i64,
    pub(crate) applicant_id: i64,
    pub(crate) resume_id: i64,
    pub(crate) applied_at: DateTime<Utc>,
}

impl NewApplication {
    pub(crate) fn pending(
        job_id: i64,
        company_id: i64,
        applicant_id: i64,
        resume_id: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id,
            company_id,
            applicant_id,
            resume_id,
            applied_at: now,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::Pending
    }

    pub fn into_application(self, id: i64) -> Application {
        let status = self.status();
        Application {
            id,
            job_id: self.job_id,
            company_id: self.company_id,
            applicant_id: self.applicant_id,
            resume_id: self.resume_id,
            status,
            status_code: status.code(),
            progress_label: status.label().to_string(),
            rejection_reason: String::new(),
            applied_at: self.applied_at,
            updated_at: self.applied_at,
        }
    }
}

/// The only write path for `status`. The label is derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub(crate) status: ApplicationStatus,
    pub(crate) rejection_reason: String,
    pub(crate) updated_at: DateTime<Utc>,
}

impl StatusChange {
    pub(crate) fn enter(
        status: ApplicationStatus,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let rejection_reason = if status.is_rejection() {
            reason.map(str::trim).unwrap_or_default().to_string()
        } else {
            String::new()
        };
        Self {
            status,
            rejection_reason,
            updated_at: now,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn progress_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn rejection_reason(&self) -> &str {
        &self.rejection_reason
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn apply_to(&self, application: &mut Application) {
        application.status = self.status;
        application.status_code = self.status.code();
        application.progress_label = self.progress_label().to_string();
        application.rejection_reason = self.rejection_reason.clone();
        application.updated_at = self.updated_at;
    }
}
