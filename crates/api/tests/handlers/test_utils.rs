use std::sync::Arc;

use axum_test::TestServer;
use seatplan_api::ApiState;
use seatplan_core::{
    models::table::{Table, TableCatalog},
    ReservationBook,
};
use serde_json::{json, Value};

pub const DATE: &str = "2024-01-15";

/// Two tables: #1 seats 2, #2 seats 4.
pub fn small_room() -> ReservationBook {
    ReservationBook::new(TableCatalog::new(vec![Table::new(1, 2), Table::new(2, 4)]).unwrap())
}

pub fn server(state: ApiState) -> TestServer {
    TestServer::new(seatplan_api::app(Arc::new(state))).unwrap()
}

pub fn in_memory_server() -> TestServer {
    server(ApiState::in_memory(small_room()))
}

pub fn booking(name: &str, party_size: u32, time: &str) -> Value {
    json!({
        "customer_name": name,
        "customer_phone": "+39 333 1234567",
        "date": DATE,
        "time": time,
        "party_size": party_size,
    })
}

/// Creates a reservation and returns its id.
pub async fn create(server: &TestServer, name: &str, party_size: u32, time: &str) -> String {
    let response = server
        .post("/api/reservations")
        .json(&booking(name, party_size, time))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"]
        .as_str()
        .expect("reservation id")
        .to_string()
}

pub async fn available(server: &TestServer, party_size: u32, time: &str) -> Vec<u64> {
    let response = server
        .get("/api/availability")
        .add_query_param("party_size", party_size)
        .add_query_param("date", DATE)
        .add_query_param("time", time)
        .await;
    response.assert_status_ok();
    response.json::<Value>()["tables"]
        .as_array()
        .expect("tables array")
        .iter()
        .map(|t| t["id"].as_u64().expect("table id"))
        .collect()
}
