use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use seatplan_api::{state::load_book, ApiState};
use seatplan_core::{
    models::{
        reservation::{
            CreateReservationRequest, Reservation, ReservationStatus, UpdateReservationRequest,
        },
        table::Table,
    },
    seed,
};
use seatplan_db::{mock::MockBookingStore, BookingStore};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{booking, server, small_room, DATE};

#[tokio::test]
async fn test_mutations_are_written_through() {
    let mut store = MockBookingStore::new();
    // create, assign, seat
    store
        .expect_save_reservation()
        .times(3)
        .returning(|_| Ok(()));
    store
        .expect_delete_reservation()
        .times(1)
        .returning(|_| Ok(true));

    let server = server(ApiState::with_store(small_room(), Arc::new(store)));
    let created = server
        .post("/api/reservations")
        .json(&booking("R1", 4, "20:00"))
        .await
        .json::<Value>();
    let id = created["id"].as_str().unwrap().to_string();

    server
        .put(&format!("/api/reservations/{id}/table"))
        .json(&json!({ "table_id": 2 }))
        .await
        .assert_status_ok();
    server
        .put(&format!("/api/reservations/{id}/status"))
        .json(&json!({ "status": "seated" }))
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/reservations/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_rejected_mutation_is_not_saved() {
    let mut store = MockBookingStore::new();
    store.expect_save_reservation().times(1).returning(|_| Ok(()));

    let server = server(ApiState::with_store(small_room(), Arc::new(store)));
    let created = server
        .post("/api/reservations")
        .json(&booking("R1", 4, "20:00"))
        .await
        .json::<Value>();
    let id = created["id"].as_str().unwrap().to_string();

    server
        .put(&format!("/api/reservations/{id}/table"))
        .json(&json!({ "table_id": 1 }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let mut store = MockBookingStore::new();
    store
        .expect_save_reservation()
        .returning(|_| Err(eyre::eyre!("connection reset")));

    let server = server(ApiState::with_store(small_room(), Arc::new(store)));
    let response = server
        .post("/api/reservations")
        .json(&booking("R1", 4, "20:00"))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["kind"], "database");
}

#[tokio::test]
async fn test_load_book_from_store() {
    let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let reservations = seed::demo_reservations(today);
    let first = reservations[0].id;

    let mut store = MockBookingStore::new();
    store
        .expect_load_tables()
        .times(1)
        .returning(|| Ok(seed::demo_tables()));
    store
        .expect_load_reservations()
        .times(1)
        .returning(move || Ok(reservations.clone()));

    let book = load_book(&store).await.unwrap();
    assert_eq!(book.catalog().len(), 12);
    assert_eq!(book.get(first).unwrap().customer_name, "Mario Rossi");
    assert_eq!(book.reservations_on(today).unwrap().len(), 3);
}

#[tokio::test]
async fn test_load_book_requires_tables() {
    let mut store = MockBookingStore::new();
    store.expect_load_tables().returning(|| Ok(Vec::<Table>::new()));
    store.expect_load_reservations().never();

    assert!(load_book(&store).await.is_err());
}

#[tokio::test]
async fn test_missing_row_on_delete_is_tolerated() {
    let mut store = MockBookingStore::new();
    store.expect_save_reservation().times(1).returning(|_| Ok(()));
    store
        .expect_delete_reservation()
        .times(1)
        .returning(|_| Ok(false));

    let server = server(ApiState::with_store(small_room(), Arc::new(store)));
    let created = server
        .post("/api/reservations")
        .json(&booking("R1", 4, "20:00"))
        .await
        .json::<Value>();
    let id = created["id"].as_str().unwrap().to_string();

    server
        .delete(&format!("/api/reservations/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

/// Keeps rows in memory and holds the first save back for a while.
#[derive(Default)]
struct SlowFirstSave {
    saves: AtomicUsize,
    rows: Mutex<HashMap<Uuid, Reservation>>,
}

impl SlowFirstSave {
    fn row(&self, id: Uuid) -> Option<Reservation> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl BookingStore for SlowFirstSave {
    async fn load_tables(&self) -> eyre::Result<Vec<Table>> {
        Ok(Vec::new())
    }

    async fn save_tables(&self, _tables: &[Table]) -> eyre::Result<()> {
        Ok(())
    }

    async fn load_reservations(&self) -> eyre::Result<Vec<Reservation>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn save_reservation(&self, reservation: &Reservation) -> eyre::Result<()> {
        if self.saves.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.rows
            .lock()
            .unwrap()
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn delete_reservation(&self, id: Uuid) -> eyre::Result<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

fn booked_state(store: Arc<SlowFirstSave>) -> (ApiState, Uuid) {
    let book = small_room();
    let booking = CreateReservationRequest {
        customer_name: "R1".to_string(),
        customer_phone: "+39 333 1234567".to_string(),
        date: Some(DATE.to_string()),
        time: Some("20:00".to_string()),
        party_size: Some(4),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let id = book.create(booking).unwrap().id;
    (ApiState::with_store(book, store), id)
}

#[tokio::test]
async fn test_slow_save_cannot_roll_status_back() {
    let store = Arc::new(SlowFirstSave::default());
    let (state, id) = booked_state(store.clone());

    let (assigned, seated) = tokio::join!(
        state.commit(|book| book.assign_table(id, 2)),
        state.commit(|book| book.advance_status(id, ReservationStatus::Seated)),
    );
    assert!(assigned.is_ok());
    assert!(seated.is_ok());

    let row = store.row(id).unwrap();
    assert_eq!(row.status, ReservationStatus::Seated);
    assert_eq!(row.table_id, Some(2));
    assert_eq!(row, state.book.get(id).unwrap());
}

#[tokio::test]
async fn test_slow_update_does_not_resurrect_a_deleted_row() {
    let store = Arc::new(SlowFirstSave::default());
    let (state, id) = booked_state(store.clone());
    let update = UpdateReservationRequest {
        notes: Some("Window seat".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let (updated, removed) = tokio::join!(
        state.commit(|book| book.update_details(id, &update)),
        state.remove(id),
    );
    assert!(updated.is_ok());
    assert!(removed.is_ok());

    assert!(store.row(id).is_none());
    assert!(state.book.get(id).is_err());
}
