use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use seatplan_core::models::{
    reservation::{
        AdvanceStatusRequest, AssignTableRequest, CreateReservationRequest, Reservation,
        ReservationStats, UpdateReservationRequest,
    },
    slot,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Lists reservations for one date, or all of them when no date is given.
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = match query.date.as_deref() {
        Some(raw) => state.book.reservations_on(slot::parse_date(raw)?)?,
        None => state.book.all_reservations()?,
    };
    Ok(Json(reservations))
}

/// Per-status counts for a date, defaulting to today.
#[axum::debug_handler]
pub async fn reservation_stats(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ReservationStats>, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => slot::parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    Ok(Json(state.book.stats_on(date)?))
}

#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let booking = payload.validate()?;
    let reservation = state.commit(|book| book.create(booking)).await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(state.book.get(id)?))
}

#[axum::debug_handler]
pub async fn update_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<Json<Reservation>, AppError> {
    let update = payload.validate()?;
    let reservation = state
        .commit(|book| book.update_details(id, &update))
        .await?;

    Ok(Json(reservation))
}

/// Deletes a reservation in any status.
#[axum::debug_handler]
pub async fn delete_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.remove(id).await?;
    if removed.is_active() {
        info!(reservation_id = %id, status = %removed.status, "active reservation deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn assign_table(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTableRequest>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state
        .commit(|book| book.assign_table(id, payload.table_id))
        .await?;

    Ok(Json(reservation))
}

#[axum::debug_handler]
pub async fn advance_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state
        .commit(|book| book.advance_status(id, payload.status))
        .await?;

    Ok(Json(reservation))
}

#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state.commit(|book| book.cancel(id)).await?;

    Ok(Json(reservation))
}

/// Removes the table from a confirmed reservation.
#[axum::debug_handler]
pub async fn unassign_table(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = state.commit(|book| book.unassign_table(id)).await?;

    Ok(Json(reservation))
}
