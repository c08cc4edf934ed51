//! API error types and their HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use pingd_core::{AutomatorError, ErrorKind};
use pingd_protocols::SchedulerError;

use crate::job::GenericResponse;

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AutomatorError> for ApiError {
    fn from(err: AutomatorError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ApiError::BadRequest(err.to_string()),
            ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            ErrorKind::Scheduling
                if matches!(
                    err,
                    AutomatorError::Scheduling {
                        source: SchedulerError::TagNotFound(_),
                        ..
                    }
                ) =>
            {
                ApiError::NotFound(err.to_string())
            }
            _ => {
                error!("Request failed: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("incorrect request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(GenericResponse::message(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingd_protocols::{JobId, StoreError};

    #[test]
    fn test_validation_is_bad_request() {
        let err = ApiError::from(AutomatorError::InvalidScheme {
            id: JobId::new(),
            scheme: "Foo".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Foo"));
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::from(AutomatorError::NotFound(JobId::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_tag_is_not_found() {
        let err = ApiError::from(AutomatorError::Scheduling {
            step: "remove",
            id: JobId::new(),
            source: SchedulerError::TagNotFound("x".to_string()),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err = ApiError::from(AutomatorError::Store {
            step: "insert record",
            id: JobId::new(),
            source: StoreError::Unavailable("down".to_string()),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_scheduler_stopped_is_internal() {
        let err = ApiError::from(AutomatorError::Scheduling {
            step: "register",
            id: JobId::new(),
            source: SchedulerError::Stopped,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
