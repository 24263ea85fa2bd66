use thiserror::Error;

use crate::jobs::LookupError;
use crate::lifecycle::status::ApplicationStatus;
use crate::store::StoreError;

/// Failures surfaced by the application lifecycle engine.
///
/// Every precondition variant is detected before any write happens.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("application {0} not found")]
    NotFound(i64),

    #[error("job {0} not found")]
    JobNotFound(i64),

    #[error("job {0} has expired")]
    JobExpired(i64),

    #[error("job {0} is no longer accepting applications")]
    JobInactive(i64),

    #[error("already applied to job {job_id}")]
    AlreadyApplied { job_id: i64 },

    #[error("actor is not allowed to modify this application")]
    Forbidden,

    #[error("unknown application status code {0}")]
    InvalidStatus(i16),

    #[error("cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("rejection reason exceeds {max} characters")]
    ReasonTooLong { max: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl LifecycleError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            LifecycleError::NotFound(_) => "APPLICATION_NOT_FOUND",
            LifecycleError::JobNotFound(_) => "JOB_NOT_FOUND",
            LifecycleError::JobExpired(_) => "JOB_EXPIRED",
            LifecycleError::JobInactive(_) => "JOB_INACTIVE",
            LifecycleError::AlreadyApplied { .. } => "ALREADY_APPLIED",
            LifecycleError::Forbidden => "FORBIDDEN",
            LifecycleError::InvalidStatus(_) => "INVALID_STATUS",
            LifecycleError::InvalidTransition { .. } => "INVALID_TRANSITION",
            LifecycleError::ReasonTooLong { .. } => "REASON_TOO_LONG",
            LifecycleError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Numeric business code shared with the rest of the recruitment platform.
    pub fn business_code(&self) -> u32 {
        match self {
            LifecycleError::NotFound(_) => 2008,
            LifecycleError::JobNotFound(_) => 2001,
            LifecycleError::JobExpired(_) => 2002,
            LifecycleError::JobInactive(_) => 2002,
            LifecycleError::AlreadyApplied { .. } => 2003,
            LifecycleError::Forbidden => 1003,
            LifecycleError::InvalidStatus(_) => 2012,
            LifecycleError::InvalidTransition { .. } => 2013,
            LifecycleError::ReasonTooLong { .. } => 1001,
            LifecycleError::Internal(_) => 9000,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LifecycleError::NotFound(id),
            other => LifecycleError::Internal(other.to_string()),
        }
    }
}

impl From<LookupError> for LifecycleError {
    fn from(err: LookupError) -> Self {
        LifecycleError::Internal(err.to_string())
    }
}
