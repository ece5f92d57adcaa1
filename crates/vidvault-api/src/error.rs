//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_service::UnsatisfiableRange;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error.
    ///
    /// Lookup failures are reported as 400 like every other client mistake.
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::NotFound
            | ErrorKind::Conflict
            | ErrorKind::Validation
            | ErrorKind::CyclicMove => StatusCode::BAD_REQUEST,
            ErrorKind::RangeNotSatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::ExternalService
            | ErrorKind::Database
            | ErrorKind::Storage
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn unsatisfied_file_size(&self) -> Option<u64> {
        self.0
            .source
            .as_deref()
            .and_then(|s| s.downcast_ref::<UnsatisfiableRange>())
            .map(|r| r.file_size)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
        } else {
            tracing::debug!(kind = %self.0.kind, error = %self.0.message, "Request rejected");
        }

        let file_size = self.unsatisfied_file_size();
        let body = ApiErrorResponse {
            error: self.0.kind.to_string(),
            message: self.0.message,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(size) = file_size {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use vidvault_service::RangeError;

    async fn body_of(response: Response) -> ApiErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_and_input_errors_are_bad_requests() {
        for err in [
            AppError::not_found("Folder x not found"),
            AppError::conflict("Folder 'Action' already exists"),
            AppError::validation("bad name"),
            AppError::cyclic_move("into itself"),
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let body = body_of(ApiError::from(AppError::not_found("Video y not found")).into_response()).await;
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Video y not found");
    }

    #[tokio::test]
    async fn test_unsatisfiable_range_advertises_file_size() {
        let err: AppError = UnsatisfiableRange {
            error: RangeError::InvalidRange,
            file_size: 1000,
        }
        .into();
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes */1000");
        assert_eq!(body_of(response).await.error, "INVALID_RANGE_HEADER");
    }

    #[test]
    fn test_failures_map_to_server_errors() {
        assert_eq!(
            ApiError::from(AppError::timeout("late")).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::from(AppError::external("yt-dlp exited with status 1")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(AppError::storage("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
