pub mod applications;
pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applications",
            post(applications::handle_create),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get).delete(applications::handle_delete),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/users/:id/applications",
            get(applications::handle_list_for_user),
        )
        .route(
            "/api/v1/jobs/:id/applications",
            get(applications::handle_list_for_job),
        )
        .route(
            "/api/v1/companies/:id/applications",
            get(applications::handle_list_for_company),
        )
        .with_state(state)
}
