use axum::{extract::State, Json};
use seatplan_core::models::table::Table;
use std::sync::Arc;

use crate::ApiState;

pub async fn list_tables(State(state): State<Arc<ApiState>>) -> Json<Vec<Table>> {
    Json(state.book.catalog().to_vec())
}
