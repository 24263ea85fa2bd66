use std::sync::Arc;

use crate::lifecycle::ApplicationLifecycle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ApplicationLifecycle>,
}
