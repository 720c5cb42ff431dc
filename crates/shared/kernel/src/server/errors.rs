//! Operator-facing JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json("Requested path not found. Please check the request URL"))
        .into_response()
}

/// Catch-all response for unexpected processing failures.
#[must_use]
pub fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json("An unexpected error occurred while processing response. Please contact admin."),
    )
        .into_response()
}

/// Response for malformed request data.
#[must_use]
pub fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, Json("Invalid request data. Please format and try again"))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn helpers_carry_the_expected_status() {
        assert_eq!(not_found().await.status(), StatusCode::NOT_FOUND);
        assert_eq!(internal_server_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(bad_request().status(), StatusCode::BAD_REQUEST);
    }
}
