use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::dispatch::NotificationDispatcher;
use crate::jobs::{JobAvailability, JobLookup, JobSummary};
use crate::lifecycle::authorization::{ensure_applicant, Actor, StatusAuthorization};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::notifications::drafts_for_transition;
use crate::lifecycle::status::ApplicationStatus;
use crate::lifecycle::transitions::TransitionTable;
use crate::models::{Application, NewApplication, StatusChange};
use crate::store::{ApplicationStore, Page, PageRequest, StoreError};

/// Upper bound on a rejection reason, in characters. Matches the
/// `job_applications.rejection_reason` column.
pub const MAX_REJECTION_REASON_CHARS: usize = 255;

/// Orchestrates submission, ownership checks and status transitions.
///
/// Holds no mutable state of its own; everything durable lives in the store.
#[derive(Clone)]
pub struct ApplicationLifecycle {
    store: Arc<dyn ApplicationStore>,
    jobs: Arc<dyn JobLookup>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    authorization: StatusAuthorization,
    transitions: &'static TransitionTable,
}

impl ApplicationLifecycle {
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        jobs: Arc<dyn JobLookup>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        authorization: StatusAuthorization,
    ) -> Self {
        Self {
            store,
            jobs,
            dispatcher,
            authorization,
            transitions: TransitionTable::standard(),
        }
    }

    pub fn authorization(&self) -> StatusAuthorization {
        self.authorization
    }

    /// Submits an application for an active job.
    ///
    /// The duplicate check and the insert are two separate store calls, so
    /// concurrent submissions for the same pair can both succeed.
    pub async fn create(
        &self,
        job_id: i64,
        applicant_id: i64,
        resume_id: i64,
    ) -> Result<Application, LifecycleError> {
        let now = Utc::now();
        let job = self
            .jobs
            .get_job(job_id)
            .await?
            .ok_or(LifecycleError::JobNotFound(job_id))?;

        match job.availability(now) {
            JobAvailability::Active => {}
            JobAvailability::Expired => return Err(LifecycleError::JobExpired(job_id)),
            JobAvailability::Inactive => return Err(LifecycleError::JobInactive(job_id)),
        }

        if self
            .store
            .find_by_applicant_and_job(applicant_id, job_id)
            .await?
            .is_some()
        {
            return Err(LifecycleError::AlreadyApplied { job_id });
        }

        let new = NewApplication::pending(job_id, job.company_id, applicant_id, resume_id, now);
        let application = self.store.create(new).await.map_err(|err| {
            error!(applicant_id, job_id, "failed to create application: {err}");
            LifecycleError::from(err)
        })?;

        info!(
            "Created application {} for applicant {applicant_id} on job {job_id}",
            application.id
        );
        Ok(application)
    }

    pub async fn get(&self, application_id: i64) -> Result<Application, LifecycleError> {
        self.store
            .get(application_id)
            .await?
            .ok_or(LifecycleError::NotFound(application_id))
    }

    /// Loads the application and checks that `actor_id` is its applicant.
    pub async fn verify_owner(
        &self,
        application_id: i64,
        actor_id: i64,
    ) -> Result<Application, LifecycleError> {
        let application = self.get(application_id).await?;
        ensure_applicant(&application, actor_id)?;
        Ok(application)
    }

    /// Applicant-only hard delete. Nothing of the record is kept.
    pub async fn delete(&self, application_id: i64, actor_id: i64) -> Result<(), LifecycleError> {
        self.verify_owner(application_id, actor_id).await?;

        self.store.delete(application_id).await.map_err(|err| {
            error!(application_id, "failed to delete application: {err}");
            LifecycleError::from(err)
        })?;

        info!("Deleted application {application_id} at the request of applicant {actor_id}");
        Ok(())
    }

    /// Moves an application along one edge of the transition table.
    ///
    /// The write only lands if the row still holds the status the edge was
    /// checked against; a concurrent change turns into `InvalidTransition`
    /// from whatever status won. Notifications are sent only after the new
    /// status is stored, and a delivery failure never fails the call.
    pub async fn update_status(
        &self,
        application_id: i64,
        actor: Actor,
        target_code: i16,
        reason: Option<&str>,
    ) -> Result<Application, LifecycleError> {
        let mut application = self.get(application_id).await?;
        self.authorization.authorize(&application, actor)?;

        let target = ApplicationStatus::from_code(target_code)?;
        let current = application.status;
        if !self.transitions.allows(current, target) {
            warn!(
                application_id,
                from = current.code(),
                to = target.code(),
                "rejected status transition"
            );
            return Err(LifecycleError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        if target.is_rejection() {
            ensure_reason_fits(reason)?;
        }

        let change = StatusChange::enter(target, reason, Utc::now());
        match self
            .store
            .update_status(application_id, current, &change)
            .await
        {
            Ok(()) => {}
            Err(StoreError::StatusChanged { current: won, .. }) => {
                warn!(
                    application_id,
                    expected = current.code(),
                    found = won.code(),
                    to = target.code(),
                    "status changed concurrently, transition dropped"
                );
                return Err(LifecycleError::InvalidTransition {
                    from: won,
                    to: target,
                });
            }
            Err(err) => {
                error!(
                    application_id,
                    status = target.code(),
                    "failed to update application status: {err}"
                );
                return Err(LifecycleError::from(err));
            }
        }
        change.apply_to(&mut application);

        info!(
            "Application {application_id} moved from {} to {}",
            current.label(),
            target.label()
        );

        self.notify_transition(&application).await;
        Ok(application)
    }

    /// Post-commit hook: drafts and sends the messages for the status the
    /// application has just entered. Failures are logged and dropped.
    async fn notify_transition(&self, application: &Application) {
        let job = self.resolve_job_for_copy(application.job_id).await;
        let drafts = drafts_for_transition(application, job.as_ref(), application.status);

        for draft in drafts {
            let notification = draft.render(application.id);
            if let Err(err) = self.dispatcher.send(&notification).await {
                error!(
                    application_id = application.id,
                    recipient = notification.recipient.audience(),
                    recipient_id = notification.recipient.target_id(),
                    channel = self.dispatcher.channel(),
                    "failed to send status notification: {err}"
                );
            }
        }
    }

    async fn resolve_job_for_copy(&self, job_id: i64) -> Option<JobSummary> {
        match self.jobs.get_job(job_id).await {
            Ok(job) => job,
            Err(err) => {
                warn!(job_id, "job lookup failed while drafting notifications: {err}");
                None
            }
        }
    }

    pub async fn list_for_applicant(
        &self,
        applicant_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, LifecycleError> {
        Ok(self.store.list_by_applicant(applicant_id, page).await?)
    }

    pub async fn list_for_job(
        &self,
        job_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, LifecycleError> {
        Ok(self.store.list_by_job(job_id, page).await?)
    }

    pub async fn list_for_company(
        &self,
        company_id: i64,
        page: PageRequest,
    ) -> Result<Page<Application>, LifecycleError> {
        Ok(self.store.list_by_company(company_id, page).await?)
    }
}

fn ensure_reason_fits(reason: Option<&str>) -> Result<(), LifecycleError> {
    let len = reason.map(|r| r.trim().chars().count()).unwrap_or_default();
    if len > MAX_REJECTION_REASON_CHARS {
        return Err(LifecycleError::ReasonTooLong {
            max: MAX_REJECTION_REASON_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::dispatch::RecordingDispatcher;
    use crate::jobs::{InMemoryJobLookup, JOB_STATUS_OPEN};
    use crate::models::Recipient;
    use crate::store::InMemoryApplicationStore;

    const COMPANY: i64 = 40;

    struct Harness {
        engine: ApplicationLifecycle,
        store: Arc<InMemoryApplicationStore>,
        jobs: Arc<InMemoryJobLookup>,
        dispatcher: Arc<RecordingDispatcher>,
    }

    fn job(id: i64, expires_in: Duration) -> JobSummary {
        JobSummary {
            id,
            name: format!("Job {id}"),
            company_id: COMPANY,
            status: JOB_STATUS_OPEN,
            expires_at: Some(Utc::now() + expires_in),
            deleted: false,
        }
    }

    fn harness(policy: StatusAuthorization) -> Harness {
        let store = Arc::new(InMemoryApplicationStore::new());
        let jobs = Arc::new(InMemoryJobLookup::new([
            job(3, Duration::days(30)),
            job(4, Duration::days(-1)),
        ]));
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let engine = ApplicationLifecycle::new(
            store.clone(),
            jobs.clone(),
            dispatcher.clone(),
            policy,
        );
        Harness {
            engine,
            store,
            jobs,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn test_create_forces_pending_and_copies_company() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.progress_label, "Pending");
        assert_eq!(app.company_id, COMPANY);
        assert_eq!(app.resume_id, 9);
        assert_eq!(app.applied_at, app.updated_at);
        assert!(app.rejection_reason.is_empty());
    }

    #[tokio::test]
    async fn test_create_twice_is_already_applied() {
        let h = harness(StatusAuthorization::CompanyOwner);
        h.engine.create(3, 7, 9).await.unwrap();
        let second = h.engine.create(3, 7, 10).await;
        assert!(matches!(second, Err(LifecycleError::AlreadyApplied { job_id: 3 })));
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_expired_and_inactive_jobs() {
        let h = harness(StatusAuthorization::CompanyOwner);
        assert!(matches!(
            h.engine.create(99, 7, 9).await,
            Err(LifecycleError::JobNotFound(99))
        ));
        assert!(matches!(
            h.engine.create(4, 7, 9).await,
            Err(LifecycleError::JobExpired(4))
        ));

        let mut deleted = job(5, Duration::days(10));
        deleted.deleted = true;
        h.jobs.upsert(deleted);
        assert!(matches!(
            h.engine.create(5, 7, 9).await,
            Err(LifecycleError::JobInactive(5))
        ));
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_on_create_is_internal() {
        let h = harness(StatusAuthorization::CompanyOwner);
        h.jobs.set_unavailable(true);
        assert!(matches!(
            h.engine.create(3, 7, 9).await,
            Err(LifecycleError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();

        assert!(matches!(
            h.engine.delete(app.id, 8).await,
            Err(LifecycleError::Forbidden)
        ));
        assert_eq!(h.engine.get(app.id).await.unwrap(), app);

        h.engine.delete(app.id, 7).await.unwrap();
        assert!(matches!(
            h.engine.get(app.id).await,
            Err(LifecycleError::NotFound(id)) if id == app.id
        ));
    }

    #[tokio::test]
    async fn test_verify_owner_missing_application() {
        let h = harness(StatusAuthorization::CompanyOwner);
        assert!(matches!(
            h.engine.verify_owner(1, 7).await,
            Err(LifecycleError::NotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_update_status_checks_in_order() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        let company = Actor::Company(COMPANY);

        assert!(matches!(
            h.engine.update_status(999, company, 2, None).await,
            Err(LifecycleError::NotFound(999))
        ));
        assert!(matches!(
            h.engine.update_status(app.id, Actor::Company(41), 2, None).await,
            Err(LifecycleError::Forbidden)
        ));
        assert!(matches!(
            h.engine.update_status(app.id, company, 42, None).await,
            Err(LifecycleError::InvalidStatus(42))
        ));
        assert!(matches!(
            h.engine.update_status(app.id, company, ApplicationStatus::Accepted.code(), None).await,
            Err(LifecycleError::InvalidTransition {
                from: ApplicationStatus::Pending,
                to: ApplicationStatus::Accepted
            })
        ));
        // Nothing was written and nothing was sent.
        assert_eq!(h.engine.get(app.id).await.unwrap(), app);
        assert!(h.dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_persists_and_notifies() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        let company = Actor::Company(COMPANY);

        let updated = h
            .engine
            .update_status(app.id, company, ApplicationStatus::InProgress.code(), None)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::InProgress);
        assert_eq!(updated.progress_label, "In Progress");
        assert_eq!(h.engine.get(app.id).await.unwrap(), updated);

        h.engine
            .update_status(app.id, company, ApplicationStatus::AwaitingInterview.code(), None)
            .await
            .unwrap();

        let sent = h.dispatcher.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].recipient, Recipient::Applicant(7));
        assert_eq!(sent[1].title, "Interview invitation");
        assert!(sent[1].content.contains("Job 3"));
        assert_eq!(sent[2].recipient, Recipient::Company(COMPANY));
    }

    #[tokio::test]
    async fn test_rejection_reason_recorded() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        let rejected = h
            .engine
            .update_status(
                app.id,
                Actor::Company(COMPANY),
                ApplicationStatus::Rejected.code(),
                Some("role filled internally"),
            )
            .await
            .unwrap();
        assert_eq!(rejected.rejection_reason, "role filled internally");
        assert!(h.dispatcher.sent()[0].content.contains("role filled internally"));
    }

    #[tokio::test]
    async fn test_oversized_rejection_reason_rejected_before_write() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        let long = "x".repeat(MAX_REJECTION_REASON_CHARS + 1);

        let result = h
            .engine
            .update_status(
                app.id,
                Actor::Company(COMPANY),
                ApplicationStatus::Rejected.code(),
                Some(&long),
            )
            .await;
        assert!(matches!(
            result,
            Err(LifecycleError::ReasonTooLong { max: MAX_REJECTION_REASON_CHARS })
        ));
        assert_eq!(
            h.engine.get(app.id).await.unwrap().status,
            ApplicationStatus::Pending
        );
        assert!(h.dispatcher.sent().is_empty());

        // Exactly at the limit (multi-byte chars count once) is accepted.
        let at_limit = "é".repeat(MAX_REJECTION_REASON_CHARS);
        let rejected = h
            .engine
            .update_status(
                app.id,
                Actor::Company(COMPANY),
                ApplicationStatus::Rejected.code(),
                Some(&at_limit),
            )
            .await
            .unwrap();
        assert_eq!(rejected.rejection_reason.chars().count(), MAX_REJECTION_REASON_CHARS);
    }

    #[tokio::test]
    async fn test_long_reason_ignored_for_non_rejection_target() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        let long = "x".repeat(MAX_REJECTION_REASON_CHARS * 2);
        let updated = h
            .engine
            .update_status(app.id, Actor::Company(COMPANY), 2, Some(&long))
            .await
            .unwrap();
        assert!(updated.rejection_reason.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_fail_transition() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        h.dispatcher.set_failing(true);

        let updated = h
            .engine
            .update_status(app.id, Actor::Company(COMPANY), 2, None)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::InProgress);
        assert_eq!(
            h.engine.get(app.id).await.unwrap().status,
            ApplicationStatus::InProgress
        );
    }

    #[tokio::test]
    async fn test_job_lookup_failure_still_notifies_with_fallback_name() {
        let h = harness(StatusAuthorization::CompanyOwner);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        h.jobs.set_unavailable(true);

        h.engine
            .update_status(app.id, Actor::Company(COMPANY), ApplicationStatus::Rejected.code(), None)
            .await
            .unwrap();
        let sent = h.dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].content.contains("this position"));
    }

    #[tokio::test]
    async fn test_store_failure_on_update_is_internal() {
        let h = harness(StatusAuthorization::Unchecked);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        h.store.set_unavailable(true);
        assert!(matches!(
            h.engine.update_status(app.id, Actor::Applicant(1), 2, None).await,
            Err(LifecycleError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_applicant_policy_lets_owner_withdraw() {
        let h = harness(StatusAuthorization::Applicant);
        let app = h.engine.create(3, 7, 9).await.unwrap();
        assert!(matches!(
            h.engine
                .update_status(app.id, Actor::Company(COMPANY), 5, None)
                .await,
            Err(LifecycleError::Forbidden)
        ));
        let withdrawn = h
            .engine
            .update_status(app.id, Actor::Applicant(7), ApplicationStatus::Withdrawn.code(), None)
            .await
            .unwrap();
        assert!(withdrawn.status.is_terminal());
    }

    #[tokio::test]
    async fn test_every_successful_transition_follows_one_edge() {
        let table = TransitionTable::standard();
        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                let h = harness(StatusAuthorization::Unchecked);
                let app = h.engine.create(3, 7, 9).await.unwrap();
                // Seed the starting state directly through the store.
                let seed = StatusChange::enter(from, None, Utc::now());
                h.store
                    .update_status(app.id, ApplicationStatus::Pending, &seed)
                    .await
                    .unwrap();

                let result = h
                    .engine
                    .update_status(app.id, Actor::Company(COMPANY), to.code(), None)
                    .await;
                match result {
                    Ok(updated) => {
                        assert!(table.allows(from, to), "{from:?} -> {to:?} should fail");
                        assert_eq!(updated.status, to);
                        assert_eq!(updated.progress_label, to.label());
                    }
                    Err(LifecycleError::InvalidTransition { .. }) => {
                        assert!(!table.allows(from, to), "{from:?} -> {to:?} should pass");
                        assert_eq!(h.engine.get(app.id).await.unwrap().status, from);
                    }
                    Err(other) => panic!("unexpected error {other:?}"),
                }
                if from.is_terminal() {
                    assert!(!table.allows(from, to));
                }
            }
        }
    }
}
