//! Persistence contract for application records.
//!
//! `postgres` is the production backend; `memory` backs tests and local demos.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lifecycle::ApplicationStatus;
use crate::models::{Application, NewApplication, StatusChange};

pub use memory::InMemoryApplicationStore;
pub use postgres::PgApplicationStore;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("application {0} not found")]
    NotFound(i64),

    /// The row no longer holds the status the caller validated against.
    #[error("application {id} is now {current}")]
    StatusChanged {
        id: i64,
        current: ApplicationStatus,
    },

    #[error("corrupt application record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Page 0 is treated as page 1; size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// A page of records plus the total number of matching records.
///
/// `total` comes from a separate count and may disagree with `records` under
/// concurrent writes.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create(&self, new: NewApplication) -> Result<Application, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Application>, StoreError>;

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: i64,
        job_id: i64,
    ) -> Result<Option<Application>, StoreError>;

    /// Compare-and-set: writes `change` only while the row is still in
    /// `expected`. Fails with `StatusChanged` when another writer got there
    /// first and with `NotFound` when the row is gone.
    async fn update_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<(), StoreError>;

    /// Hard delete. Fails with `NotFound` when no row was removed.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn list_by_applicant(
        &self,
        applicant_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError>;

    async fn list_by_job(&self, job_id: i64, page: PageRequest)
        -> Result<Page<Application>, StoreError>;

    async fn list_by_company(
        &self,
        company_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, StoreError>;
}
