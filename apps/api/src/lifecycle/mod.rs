//! Job-application lifecycle: the status pipeline, its guards, and the
//! notifications each transition produces.

pub mod authorization;
pub mod engine;
pub mod error;
pub mod notifications;
pub mod status;
pub mod transitions;

pub use authorization::{Actor, StatusAuthorization};
pub use engine::{ApplicationLifecycle, MAX_REJECTION_REASON_CHARS};
pub use error::LifecycleError;
pub use notifications::{drafts_for_transition, NotificationDraft, NotificationKind};
pub use status::ApplicationStatus;
pub use transitions::TransitionTable;
