use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{JobLookup, JobSummary, LookupError};

/// Fixed set of postings, for tests and local runs without a job catalogue.
#[derive(Default)]
pub struct InMemoryJobLookup {
    jobs: RwLock<HashMap<i64, JobSummary>>,
    unavailable: AtomicBool,
}

impl InMemoryJobLookup {
    pub fn new(jobs: impl IntoIterator<Item = JobSummary>) -> Self {
        Self {
            jobs: RwLock::new(jobs.into_iter().map(|job| (job.id, job)).collect()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn upsert(&self, job: JobSummary) {
        if let Ok(mut jobs) = self.jobs.write() {
            jobs.insert(job.id, job);
        }
    }

    /// Makes every subsequent lookup fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobLookup for InMemoryJobLookup {
    async fn get_job(&self, job_id: i64) -> Result<Option<JobSummary>, LookupError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("job catalogue offline".to_string()));
        }
        let jobs = self
            .jobs
            .read()
            .map_err(|_| LookupError::Unavailable("job map poisoned".to_string()))?;
        Ok(jobs.get(&job_id).cloned())
    }
}
