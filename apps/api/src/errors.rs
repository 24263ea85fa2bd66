use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::lifecycle::LifecycleError;

/// HTTP-boundary error. Handlers return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, business_code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", 1001, msg.clone())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", 1002, msg.clone())
            }
            AppError::Lifecycle(err) => {
                let status = match err {
                    LifecycleError::NotFound(_) | LifecycleError::JobNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    LifecycleError::Forbidden => StatusCode::FORBIDDEN,
                    LifecycleError::AlreadyApplied { .. }
                    | LifecycleError::InvalidTransition { .. } => StatusCode::CONFLICT,
                    LifecycleError::JobExpired(_)
                    | LifecycleError::JobInactive(_)
                    | LifecycleError::InvalidStatus(_)
                    | LifecycleError::ReasonTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    LifecycleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match err {
                    LifecycleError::Internal(detail) => {
                        tracing::error!("Internal error: {detail}");
                        "An internal server error occurred".to_string()
                    }
                    other => other.to_string(),
                };
                (status, err.code(), err.business_code(), message)
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "business_code": business_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_details_are_hidden() {
        let response =
            AppError::from(LifecycleError::Internal("connection refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LifecycleError::NotFound(1), StatusCode::NOT_FOUND),
            (LifecycleError::Forbidden, StatusCode::FORBIDDEN),
            (LifecycleError::AlreadyApplied { job_id: 3 }, StatusCode::CONFLICT),
            (LifecycleError::JobExpired(3), StatusCode::UNPROCESSABLE_ENTITY),
            (LifecycleError::InvalidStatus(99), StatusCode::UNPROCESSABLE_ENTITY),
            (
                LifecycleError::ReasonTooLong { max: 255 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}
