use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::{config::DuplicateEmailStatus, users::repo::RepoError};

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("User not found")]
    NotFound,
    /// Carries the status chosen by [`DuplicateEmailStatus`].
    #[error("User already exists")]
    DuplicateEmail(StatusCode),
    #[error("{0}")]
    Validation(String),
    /// Framework-level rejection (malformed JSON, wrong content type, bad path id).
    #[error("{1}")]
    Rejected(StatusCode, String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEmail(status) => *status,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected(status, _) => *status,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn from_repo(err: RepoError, duplicate: DuplicateEmailStatus) -> Self {
        match err {
            RepoError::DuplicateEmail(_) => Self::DuplicateEmail(duplicate.status()),
            RepoError::Db(e) => e.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        error!(error = %e, "database error");
        Self::Internal
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_renders_detail_body() {
        let res = ApiError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"detail": "User not found"}));
    }

    #[test]
    fn duplicate_email_follows_configured_status() {
        let err = ApiError::from_repo(
            RepoError::DuplicateEmail("ann@x.com".into()),
            DuplicateEmailStatus::NotFound,
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "User already exists");

        let err = ApiError::from_repo(
            RepoError::DuplicateEmail("ann@x.com".into()),
            DuplicateEmailStatus::Conflict,
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failures_are_not_leaked() {
        let err = ApiError::from_repo(
            RepoError::Db(sqlx::Error::PoolTimedOut),
            DuplicateEmailStatus::NotFound,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn validation_is_unprocessable() {
        let err = ApiError::Validation("name must not be empty".into());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "name must not be empty");
    }
}
