//! # Availability Handlers
//!
//! Lists the tables that can seat a party at a given slot. A table is
//! offered when it is large enough and no confirmed or seated reservation
//! holds it for exactly that date and time. Results are ordered by table
//! number so selection lists stay stable between calls.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use seatplan_core::{
    errors::BookingError,
    models::{slot, table::Table},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint
///
/// `date` and `time` arrive as text so malformed values come back as
/// validation errors rather than extractor rejections.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Number of guests to seat
    pub party_size: u32,
    /// Service date, `YYYY-MM-DD`
    pub date: String,
    /// Time of day, `HH:MM`
    pub time: String,
    /// Reservation being edited, ignored when computing claimed tables
    pub exclude: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub tables: Vec<Table>,
}

/// Finds free tables for a party
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?party_size=4&date=2024-01-15&time=20:00&exclude=<uuid>
/// ```
///
/// A party larger than every table gets an empty list, not an error.
///
/// # Errors
///
/// * `BookingError::Validation` - zero party size, malformed date or time
#[axum::debug_handler]
pub async fn available_tables(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    if query.party_size == 0 {
        return Err(AppError(BookingError::Validation(
            "party size must be at least 1".to_string(),
        )));
    }
    let date = slot::parse_date(&query.date)?;
    let time = slot::parse_time(&query.time)?;

    let tables = state
        .book
        .available_tables(query.party_size, date, time, query.exclude)?;

    Ok(Json(AvailabilityResponse { tables }))
}
