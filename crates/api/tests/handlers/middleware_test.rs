use axum::{http::StatusCode, response::IntoResponse};
use rstest::rstest;
use seatplan_api::middleware::error_handling::AppError;
use seatplan_core::{errors::BookingError, models::reservation::ReservationStatus};

#[rstest]
#[case(BookingError::NotFound("Reservation not found".to_string()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Capacity("Too small".to_string()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(BookingError::Precondition("No table".to_string()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(BookingError::Conflict("Taken".to_string()), StatusCode::CONFLICT)]
#[case(
    BookingError::InvalidTransition {
        from: ReservationStatus::Completed,
        to: ReservationStatus::Seated,
    },
    StatusCode::CONFLICT
)]
#[case(BookingError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(BookingError::Internal("lock poisoned".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let error = AppError(error);
    assert_eq!(error.status(), expected);
    assert_eq!(error.into_response().status(), expected);
}
