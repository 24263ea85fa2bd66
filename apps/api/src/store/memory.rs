use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ApplicationStore, Page, PageRequest, StoreError};
use crate::lifecycle::ApplicationStatus;
use crate::models::{Application, NewApplication, StatusChange};

#[derive(Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Application>,
}

/// Process-local store with the same ordering and paging rules as Postgres.
#[derive(Default)]
pub struct InMemoryApplicationStore {
    rows: Mutex<Rows>,
    unavailable: AtomicBool,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows().map(|rows| rows.by_id.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> Result<MutexGuard<'_, Rows>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store marked unavailable".to_string()));
        }
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }

    fn list_matching(
        &self,
        page: PageRequest,
        predicate: impl Fn(&Application) -> bool,
    ) -> Result<Page<Application>, StoreError> {
        let rows = self.rows()?;
        let mut matching: Vec<&Application> = rows.by_id.values().filter(|a| predicate(a)).collect();
        matching.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();

        Ok(Page {
            records,
            total,
            page: page.page,
            size: page.size,
        })
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut rows = self.rows()?;
        rows.next_id += 1;
        let application = new.into_application(rows.next_id);
        rows.by_id.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get(&self, id: i64) -> Result<Option<Application>, StoreError> {
        Ok(self.rows()?.by_id.get(&id).cloned())
    }

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: i64,
        job_id: i64,
    ) -> Result<Option<Application>, StoreError> {
        Ok(self
            .rows()?
            .by_id
            .values()
            .find(|a| a.applicant_id == applicant_id && a.job_id == job_id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        let application = rows.by_id.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if application.status != expected {
            return Err(StoreError::StatusChanged {
                id,
                current: application.status,
            });
        }
        change.apply_to(application);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.rows()?
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_by_applicant(
        &self,
        applicant_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_matching(page, |a| a.applicant_id == applicant_id)
    }

    async fn list_by_job(
        &self,
        job_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_matching(page, |a| a.job_id == job_id)
    }

    async fn list_by_company(
        &self,
        company_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError> {
        self.list_matching(page, |a| a.company_id == company_id)
    }
}
