use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result, WrapErr};
use seatplan_core::models::{
    reservation::{Reservation, ReservationStatus},
    table::Table,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTable {
    pub id: i32,
    pub capacity: i32,
    pub label: Option<String>,
}

impl DbTable {
    pub fn from_table(table: &Table) -> Result<Self> {
        Ok(Self {
            id: to_db_int(table.id, "table id")?,
            capacity: to_db_int(table.capacity, "table capacity")?,
            label: table.label.clone(),
        })
    }

    pub fn into_table(self) -> Result<Table> {
        Ok(Table {
            id: from_db_int(self.id, "table id")?,
            capacity: from_db_int(self.capacity, "table capacity")?,
            label: self.label,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub party_size: i32,
    pub table_id: Option<i32>,
    pub status: String,
    pub notes: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbReservation {
    pub fn from_reservation(reservation: &Reservation) -> Result<Self> {
        Ok(Self {
            id: reservation.id,
            customer_name: reservation.customer_name.clone(),
            customer_phone: reservation.customer_phone.clone(),
            customer_email: reservation.customer_email.clone(),
            reservation_date: reservation.date,
            reservation_time: reservation.time,
            party_size: to_db_int(reservation.party_size, "party size")?,
            table_id: reservation
                .table_id
                .map(|id| to_db_int(id, "table id"))
                .transpose()?,
            status: reservation.status.as_str().to_string(),
            notes: reservation.notes.clone(),
            special_requests: reservation.special_requests.clone(),
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        })
    }

    pub fn into_reservation(self) -> Result<Reservation> {
        let status: ReservationStatus = self
            .status
            .parse()
            .wrap_err_with(|| format!("Reservation {} has an unreadable status", self.id))?;

        Ok(Reservation {
            id: self.id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            date: self.reservation_date,
            time: self.reservation_time,
            party_size: from_db_int(self.party_size, "party size")?,
            table_id: self
                .table_id
                .map(|id| from_db_int(id, "table id"))
                .transpose()?,
            status,
            notes: self.notes,
            special_requests: self.special_requests,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn to_db_int(value: u32, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| eyre!("{} {} does not fit in an INTEGER column", what, value))
}

fn from_db_int(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| eyre!("{} {} is negative", what, value))
}
