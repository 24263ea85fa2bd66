//! Axum route handlers for the application lifecycle.
//!
//! Callers identify themselves with `X-User-Id` (applicant) or
//! `X-Company-Id` (hiring company). Authentication happens upstream.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::lifecycle::Actor;
use crate::models::Application;
use crate::state::AppState;
use crate::store::{Page, PageRequest, DEFAULT_PAGE_SIZE};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const COMPANY_ID_HEADER: &str = "x-company-id";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: i64,
    pub resume_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Numeric status code, see `ApplicationStatus::code`.
    pub status: i16,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(
            query.page.unwrap_or(1),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Actor extraction
// ────────────────────────────────────────────────────────────────────────────

fn header_id(headers: &HeaderMap, name: &str) -> Result<Option<i64>, AppError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("{name} must be a numeric id")))
}

fn applicant_id(headers: &HeaderMap) -> Result<i64, AppError> {
    header_id(headers, USER_ID_HEADER)?
        .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))
}

/// A company header takes precedence over a user header.
fn actor(headers: &HeaderMap) -> Result<Actor, AppError> {
    if let Some(company_id) = header_id(headers, COMPANY_ID_HEADER)? {
        return Ok(Actor::Company(company_id));
    }
    applicant_id(headers).map(Actor::Applicant)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
pub async fn handle_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let applicant_id = applicant_id(&headers)?;
    let application = state
        .lifecycle
        .create(req.job_id, applicant_id, req.resume_id)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Application>, AppError> {
    Ok(Json(state.lifecycle.get(id).await?))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let applicant_id = applicant_id(&headers)?;
    state.lifecycle.delete(id, applicant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Application>, AppError> {
    let actor = actor(&headers)?;
    let application = state
        .lifecycle
        .update_status(id, actor, req.status, req.reason.as_deref())
        .await?;
    Ok(Json(application))
}

/// GET /api/v1/users/:id/applications
pub async fn handle_list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Application>>, AppError> {
    Ok(Json(
        state
            .lifecycle
            .list_for_applicant(user_id, query.into())
            .await?,
    ))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Application>>, AppError> {
    Ok(Json(state.lifecycle.list_for_job(job_id, query.into()).await?))
}

/// GET /api/v1/companies/:id/applications
pub async fn handle_list_for_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Application>>, AppError> {
    Ok(Json(
        state
            .lifecycle
            .list_for_company(company_id, query.into())
            .await?,
    ))
}
