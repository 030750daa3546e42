//! # Error Handling Middleware
//!
//! Maps the booking error taxonomy to HTTP status codes and JSON error
//! bodies, so every handler reports failures the same way.
//!
//! | Error | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `Validation` | 400 |
//! | `Capacity`, `Precondition` | 422 |
//! | `Conflict`, `InvalidTransition` | 409 |
//! | `Database`, `Internal` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatplan_core::errors::BookingError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use seatplan_api::middleware::error_handling::AppError;
/// use seatplan_core::errors::BookingError;
///
/// async fn handler(party_size: u32) -> Result<Json<u32>, AppError> {
///     if party_size == 0 {
///         return Err(AppError(BookingError::Validation("party size is required".into())));
///     }
///     Ok(Json(party_size))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Capacity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Precondition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match &self.0 {
            BookingError::NotFound(_) => "not_found",
            BookingError::Validation(_) => "validation",
            BookingError::Capacity(_) => "capacity",
            BookingError::Precondition(_) => "precondition",
            BookingError::Conflict(_) => "conflict",
            BookingError::InvalidTransition { .. } => "invalid_transition",
            BookingError::Database(_) => "database",
            BookingError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(json!({ "error": self.0.to_string(), "kind": self.kind() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as database errors
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
