use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::lifecycle::error::LifecycleError;
use crate::models::Application;

/// Who is invoking a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Applicant(i64),
    Company(i64),
}

/// Who may move an application between statuses.
///
/// Different revisions of the platform disagreed on this, so the choice is
/// a deployment setting rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAuthorization {
    /// The company the application was filed against.
    #[default]
    CompanyOwner,
    /// The applicant who filed it.
    Applicant,
    /// Anyone. Matches the revision that performed no check.
    Unchecked,
}

impl FromStr for StatusAuthorization {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "company" | "company_owner" => Ok(Self::CompanyOwner),
            "applicant" => Ok(Self::Applicant),
            "unchecked" | "none" => Ok(Self::Unchecked),
            other => Err(format!(
                "unknown status authorization '{other}' (expected company, applicant or unchecked)"
            )),
        }
    }
}

/// Applicant-ownership check used by delete (and by status changes under
/// `StatusAuthorization::Applicant`).
pub fn ensure_applicant(application: &Application, actor_id: i64) -> Result<(), LifecycleError> {
    if application.applicant_id != actor_id {
        warn!(
            application_id = application.id,
            actor_id,
            owner_id = application.applicant_id,
            "actor attempted to modify another applicant's application"
        );
        return Err(LifecycleError::Forbidden);
    }
    Ok(())
}

impl StatusAuthorization {
    pub fn authorize(self, application: &Application, actor: Actor) -> Result<(), LifecycleError> {
        match (self, actor) {
            (StatusAuthorization::Unchecked, _) => Ok(()),
            (StatusAuthorization::Applicant, Actor::Applicant(user_id)) => {
                ensure_applicant(application, user_id)
            }
            (StatusAuthorization::CompanyOwner, Actor::Company(company_id))
                if company_id == application.company_id =>
            {
                Ok(())
            }
            (policy, actor) => {
                warn!(
                    application_id = application.id,
                    ?actor,
                    ?policy,
                    "status change rejected by authorization policy"
                );
                Err(LifecycleError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::NewApplication;

    fn application() -> Application {
        NewApplication::pending(3, 40, 7, 9, Utc::now()).into_application(1)
    }

    #[test]
    fn test_company_owner_policy() {
        let app = application();
        let policy = StatusAuthorization::CompanyOwner;
        assert!(policy.authorize(&app, Actor::Company(40)).is_ok());
        assert!(matches!(
            policy.authorize(&app, Actor::Company(41)),
            Err(LifecycleError::Forbidden)
        ));
        assert!(matches!(
            policy.authorize(&app, Actor::Applicant(7)),
            Err(LifecycleError::Forbidden)
        ));
    }

    #[test]
    fn test_applicant_policy() {
        let app = application();
        let policy = StatusAuthorization::Applicant;
        assert!(policy.authorize(&app, Actor::Applicant(7)).is_ok());
        assert!(policy.authorize(&app, Actor::Applicant(8)).is_err());
        assert!(policy.authorize(&app, Actor::Company(40)).is_err());
    }

    #[test]
    fn test_unchecked_policy_allows_anyone() {
        let app = application();
        assert!(StatusAuthorization::Unchecked
            .authorize(&app, Actor::Company(999))
            .is_ok());
    }

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("company".parse(), Ok(StatusAuthorization::CompanyOwner));
        assert_eq!(" Applicant ".parse(), Ok(StatusAuthorization::Applicant));
        assert_eq!("none".parse(), Ok(StatusAuthorization::Unchecked));
        assert!("admin".parse::<StatusAuthorization>().is_err());
    }
}
