//! Error types for the todo service.
//!
//! `DbError` is what the repository returns. `ApiError` is what handlers
//! return; it renders as `{"detail": "..."}` with a stable status code.
//! Store failures are logged here and reach the caller as a plain 500.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("todo {id} not found")]
    NotFound { id: i64 },
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("Todo not found")]
    NotFound,

    /// 422, raised before handler logic runs.
    #[error("{0}")]
    Validation(String),

    /// 400
    #[error("Delete not confirmed")]
    ConfirmationRequired,

    /// 500, logged.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ConfirmationRequired => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => Self::NotFound,
            DbError::Sqlx(err) => Self::Database(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn detail(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["detail"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(detail(response).await, "Todo not found");
    }

    #[tokio::test]
    async fn unconfirmed_delete_is_400() {
        let response = ApiError::ConfirmationRequired.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(detail(response).await, "Delete not confirmed");
    }

    #[tokio::test]
    async fn validation_is_422() {
        let response = ApiError::Validation("missing field `title`".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail(response).await, "missing field `title`");
    }

    #[tokio::test]
    async fn database_error_hides_cause() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail(response).await, "Internal server error");
    }

    #[test]
    fn db_not_found_maps_to_api_not_found() {
        let err: ApiError = DbError::NotFound { id: 3 }.into();
        assert!(matches!(err, ApiError::NotFound));
    }
}
