//! API error handling.
//!
//! Errors are serialized as `{"error": "<message>"}`. Database details never
//! reach the client; they are logged on conversion to [`ApiError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create the generic internal server error.
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, INTERNAL_ERROR_MESSAGE)
    }

    /// Error code of this error.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<crate::NoticeBoardError> for ApiError {
    fn from(err: crate::NoticeBoardError) -> Self {
        tracing::error!("Error querying the database: {}", err);
        ApiError::internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        assert_eq!(ApiError::bad_request("bad").code(), ErrorCode::BadRequest);
        assert_eq!(ApiError::unauthorized("no").code(), ErrorCode::Unauthorized);

        let err = ApiError::internal();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn test_from_domain_error_hides_details() {
        let err: ApiError =
            crate::NoticeBoardError::Database("no such table: notice_board".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::unauthorized("Invalid Student Number").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Invalid Student Number" }));
    }
}
