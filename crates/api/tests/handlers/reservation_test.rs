use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{available, booking, create, in_memory_server, DATE};

#[tokio::test]
async fn test_create_and_get_reservation() {
    let server = in_memory_server();
    let id = create(&server, "Mario Rossi", 4, "20:00").await;

    let response = server.get(&format!("/api/reservations/{id}")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["customer_name"], "Mario Rossi");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["time"], "20:00");
    assert_eq!(body["date"], DATE);
    assert_eq!(body["table_id"], Value::Null);
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let server = in_memory_server();

    let mut form = booking("Mario Rossi", 4, "20:00");
    form["customer_phone"] = json!("");
    let response = server.post("/api/reservations").json(&form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "validation");

    let response = server
        .post("/api/reservations")
        .json(&booking("Mario Rossi", 25, "20:00"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_taken_table_conflicts() {
    let server = in_memory_server();
    let mut first = booking("R1", 4, "20:00");
    first["table_id"] = json!(2);
    server
        .post("/api/reservations")
        .json(&first)
        .await
        .assert_status(StatusCode::CREATED);

    let mut second = booking("R2", 2, "20:00");
    second["table_id"] = json!(2);
    let response = server.post("/api/reservations").json(&second).await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_second_assignment_of_same_table_conflicts() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    let r2 = create(&server, "R2", 2, "20:00").await;

    server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    let response = server
        .put(&format!("/api/reservations/{r2}/table"))
        .json(&json!({ "table_id": 2 }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "conflict");
}

#[tokio::test]
async fn test_too_small_table_is_a_capacity_error() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;

    let response = server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 1 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["kind"], "capacity");

    let response = server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 42 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_lifecycle() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    let status_url = format!("/api/reservations/{r1}/status");

    // Seating needs a table first.
    let response = server.put(&status_url).json(&json!({ "status": "seated" })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["kind"], "precondition");

    // Completion cannot skip seating.
    let response = server.put(&status_url).json(&json!({ "status": "completed" })).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "invalid_transition");

    server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    let response = server.put(&status_url).json(&json!({ "status": "seated" })).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "seated");

    let response = server.put(&status_url).json(&json!({ "status": "completed" })).await;
    response.assert_status_ok();

    // No way back from completed.
    let response = server.put(&status_url).json(&json!({ "status": "seated" })).await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_frees_the_table() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    assert!(available(&server, 4, "20:00").await.is_empty());

    let response = server.post(&format!("/api/reservations/{r1}/cancel")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["table_id"], 2);

    assert_eq!(available(&server, 4, "20:00").await, vec![2]);
}

#[tokio::test]
async fn test_update_and_reschedule() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 2, "20:00").await;

    let response = server
        .put(&format!("/api/reservations/{r1}"))
        .json(&json!({ "date": "2024-01-16", "time": "21:15", "notes": "Birthday" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["date"], "2024-01-16");
    assert_eq!(body["time"], "21:15");
    assert_eq!(body["notes"], "Birthday");

    let day_one = server
        .get("/api/reservations")
        .add_query_param("date", DATE)
        .await
        .json::<Vec<Value>>();
    assert!(day_one.is_empty());

    let day_two = server
        .get("/api/reservations")
        .add_query_param("date", "2024-01-16")
        .await
        .json::<Vec<Value>>();
    assert_eq!(day_two.len(), 1);
}

#[tokio::test]
async fn test_delete_seated_reservation() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    server
        .put(&format!("/api/reservations/{r1}/table"))
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    server
        .put(&format!("/api/reservations/{r1}/status"))
        .json(&json!({ "status": "seated" }))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/reservations/{r1}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/reservations/{r1}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/reservations/{r1}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_stats_for_a_day() {
    let server = in_memory_server();
    let late = create(&server, "Late", 2, "21:00").await;
    create(&server, "Early", 4, "19:00").await;
    server.post(&format!("/api/reservations/{late}/cancel")).await.assert_status_ok();

    let list = server
        .get("/api/reservations")
        .add_query_param("date", DATE)
        .await
        .json::<Vec<Value>>();
    let names: Vec<&str> = list.iter().filter_map(|r| r["customer_name"].as_str()).collect();
    assert_eq!(names, vec!["Early", "Late"]);

    let stats = server
        .get("/api/reservations/stats")
        .add_query_param("date", DATE)
        .await
        .json::<Value>();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["confirmed"], 1);
    assert_eq!(stats["cancelled"], 1);
    assert_eq!(stats["total_guests"], 6);
}

#[tokio::test]
async fn test_unknown_reservation_is_not_found() {
    let server = in_memory_server();
    let id = uuid::Uuid::new_v4();

    server
        .get(&format!("/api/reservations/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post(&format!("/api/reservations/{id}/cancel"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_memory_storage() {
    let server = in_memory_server();
    let body = server.get("/health").await.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["tables"], 2);
}

#[tokio::test]
async fn test_unassign_table() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    let table_url = format!("/api/reservations/{r1}/table");

    server
        .put(&table_url)
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    assert!(available(&server, 4, "20:00").await.is_empty());

    let response = server.delete(&table_url).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["table_id"], Value::Null);
    assert_eq!(available(&server, 4, "20:00").await, vec![2]);
}

#[tokio::test]
async fn test_seated_reservation_keeps_its_table() {
    let server = in_memory_server();
    let r1 = create(&server, "R1", 4, "20:00").await;
    let table_url = format!("/api/reservations/{r1}/table");

    server
        .put(&table_url)
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    server
        .put(&format!("/api/reservations/{r1}/status"))
        .json(&json!({ "status": "seated" }))
        .await
        .assert_status_ok();

    let response = server.delete(&table_url).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["kind"], "precondition");

    let body = server.get(&format!("/api/reservations/{r1}")).await.json::<Value>();
    assert_eq!(body["table_id"], 2);
    assert_eq!(body["status"], "seated");
}
