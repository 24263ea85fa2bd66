use async_trait::async_trait;
use sqlx::PgPool;

use super::{JobLookup, JobSummary, LookupError};

/// Reads postings owned by the job catalogue from the shared `jobs` table.
#[derive(Clone)]
pub struct PgJobLookup {
    pool: PgPool,
}

impl PgJobLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobLookup for PgJobLookup {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobSummary>, LookupError> {
        Ok(sqlx::query_as::<_, JobSummary>(
            "SELECT id, name, company_id, status, expires_at, deleted FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
