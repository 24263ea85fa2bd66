use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{ApplicationStore, Page, PageRequest, StoreError};
use crate::lifecycle::ApplicationStatus;
use crate::models::{Application, ApplicationRow, NewApplication, StatusChange};

const SELECT_COLUMNS: &str = r#"
    SELECT id, job_id, company_id, user_id, resume_id, status, progress_label,
           rejection_reason, applied_at, updated_at
    FROM job_applications
"#;

/// `job_applications` backed store.
#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count and page queries run separately, newest submission first.
    async fn list_where(
        &self,
        column: &'static str,
        value: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM job_applications WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE {column} = $1 ORDER BY applied_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(value)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Listed {} of {total} applications where {column} = {value}",
            rows.len()
        );

        Ok(Page {
            records: rows
                .into_iter()
                .map(Application::try_from)
                .collect::<Result<_, _>>()?,
            total,
            page: page.page,
            size: page.size,
        })
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError> {
        let status = new.status();
        let row: ApplicationRow = sqlx::query_as(
            r#"
            INSERT INTO job_applications
                (job_id, company_id, user_id, resume_id, status, progress_label,
                 rejection_reason, applied_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, '', $7, $7)
            RETURNING id, job_id, company_id, user_id, resume_id, status, progress_label,
                      rejection_reason, applied_at, updated_at
            "#,
        )
        .bind(new.job_id)
        .bind(new.company_id)
        .bind(new.applicant_id)
        .bind(new.resume_id)
        .bind(status.code())
        .bind(status.label())
        .bind(new.applied_at)
        .fetch_one(&self.pool)
        .await?;

        Application::try_from(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Application>, StoreError> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Application::try_from).transpose()
    }

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: i64,
        job_id: i64,
    ) -> Result<Option<Application>, StoreError> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 AND job_id = $2 ORDER BY id LIMIT 1"
        ))
        .bind(applicant_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET status = $1, progress_label = $2, rejection_reason = $3, updated_at = $4
            WHERE id = $5 AND status = $6
            "#,
        )
        .bind(change.status().code())
        .bind(change.progress_label())
        .bind(change.rejection_reason())
        .bind(change.updated_at())
        .bind(id)
        .bind(expected.code())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing matched: either the row is gone or its status moved on.
        let current: Option<i16> =
            sqlx::query_scalar("SELECT status FROM job_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match current {
            None => Err(StoreError::NotFound(id)),
            Some(code) => {
                let current = ApplicationStatus::from_code(code).map_err(|_| {
                    StoreError::Corrupt(format!(
                        "application {id} has unknown status code {code}"
                    ))
                })?;
                debug!(
                    "Application {id} status moved from {} to {} before update",
                    expected.label(),
                    current.label()
                );
                Err(StoreError::StatusChanged { id, current })
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list_by_applicant(
        &self,
        applicant_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_where("user_id", applicant_id, page).await
    }

    async fn list_by_job(
        &self,
        job_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_where("job_id", job_id, page).await
    }

    async fn list_by_company(
        &self,
        company_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_where("company_id", company_id, page).await
    }
}
