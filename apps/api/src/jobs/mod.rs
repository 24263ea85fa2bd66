//! Read-only view of job postings needed by the application lifecycle.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

pub use memory::InMemoryJobLookup;
pub use postgres::PgJobLookup;

/// Posting status column value for jobs open to applicants.
pub const JOB_STATUS_OPEN: i16 = 1;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("job lookup failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("job lookup unavailable: {0}")]
    Unavailable(String),
}

/// The slice of a job posting the lifecycle engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub status: i16,
    pub expires_at: Option<DateTime<Utc>>,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAvailability {
    Active,
    Expired,
    Inactive,
}

impl JobSummary {
    /// Deleted or closed postings are inactive; an open posting past its
    /// expiry is expired.
    pub fn availability(&self, now: DateTime<Utc>) -> JobAvailability {
        if self.deleted || self.status != JOB_STATUS_OPEN {
            return JobAvailability::Inactive;
        }
        match self.expires_at {
            Some(expires_at) if expires_at <= now => JobAvailability::Expired,
            _ => JobAvailability::Active,
        }
    }
}

#[async_trait]
pub trait JobLookup: Send + Sync {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobSummary>, LookupError>;
}
