//! Demo dining room used when the server runs without a database.

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::{
        reservation::{Reservation, ReservationStatus},
        table::{Table, TableCatalog},
    },
};

/// Table number and seats for the twelve-table room.
const DEMO_TABLES: [(u32, u32); 12] = [
    (1, 2),
    (2, 4),
    (3, 2),
    (4, 4),
    (5, 4),
    (6, 8),
    (7, 2),
    (8, 6),
    (9, 6),
    (10, 2),
    (11, 4),
    (12, 2),
];

pub fn demo_tables() -> Vec<Table> {
    DEMO_TABLES
        .iter()
        .map(|&(id, capacity)| Table::new(id, capacity))
        .collect()
}

pub fn demo_catalog() -> BookingResult<TableCatalog> {
    TableCatalog::new(demo_tables())
}

/// A service day around `today`: a few bookings in every status, all
/// consistent with [`demo_catalog`].
pub fn demo_reservations(today: NaiveDate) -> Vec<Reservation> {
    let yesterday = today.pred_opt().unwrap_or(today);
    let tomorrow = today.succ_opt().unwrap_or(today);

    vec![
        demo(
            "Mario Rossi",
            "+39 333 1234567",
            Some("mario.rossi@email.com"),
            today,
            (20, 0),
            4,
            Some(8),
            ReservationStatus::Confirmed,
            Some("Wedding anniversary"),
            Some("Table by the window"),
        ),
        demo(
            "Anna Bianchi",
            "+39 347 9876543",
            None,
            today,
            (19, 30),
            2,
            Some(5),
            ReservationStatus::Seated,
            None,
            None,
        ),
        demo(
            "Giuseppe Verdi",
            "+39 320 5555555",
            None,
            today,
            (21, 0),
            6,
            None,
            ReservationStatus::Confirmed,
            Some("Business dinner"),
            Some("Vegetarian menu for two"),
        ),
        demo(
            "Laura Ferrari",
            "+39 366 7777777",
            Some("laura.ferrari@email.com"),
            tomorrow,
            (20, 30),
            3,
            None,
            ReservationStatus::Confirmed,
            None,
            None,
        ),
        demo(
            "Francesco Neri",
            "+39 339 8888888",
            None,
            yesterday,
            (19, 0),
            2,
            Some(12),
            ReservationStatus::Completed,
            None,
            None,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn demo(
    name: &str,
    phone: &str,
    email: Option<&str>,
    date: NaiveDate,
    (hour, minute): (u32, u32),
    party_size: u32,
    table_id: Option<u32>,
    status: ReservationStatus,
    notes: Option<&str>,
    special_requests: Option<&str>,
) -> Reservation {
    let now = Utc::now();
    Reservation {
        id: Uuid::new_v4(),
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        customer_email: email.map(str::to_string),
        date,
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
        party_size,
        table_id,
        status,
        notes: notes.map(str::to_string),
        special_requests: special_requests.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}
