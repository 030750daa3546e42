use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/reservations",
            get(handlers::reservation::list_reservations)
                .post(handlers::reservation::create_reservation),
        )
        .route(
            "/api/reservations/stats",
            get(handlers::reservation::reservation_stats),
        )
        .route(
            "/api/reservations/:id",
            get(handlers::reservation::get_reservation)
                .put(handlers::reservation::update_reservation)
                .delete(handlers::reservation::delete_reservation),
        )
        .route(
            "/api/reservations/:id/table",
            put(handlers::reservation::assign_table)
                .delete(handlers::reservation::unassign_table),
        )
        .route(
            "/api/reservations/:id/status",
            put(handlers::reservation::advance_status),
        )
        .route(
            "/api/reservations/:id/cancel",
            post(handlers::reservation::cancel_reservation),
        )
}
