//! # Booking Store
//!
//! The persistence side of the reservation book. It supplies the table
//! catalog and the reservation set at startup and receives every successful
//! mutation afterwards. The book itself never talks to the store.

use async_trait::async_trait;
use eyre::Result;
use seatplan_core::models::{reservation::Reservation, table::Table};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{DbReservation, DbTable},
    repositories::{reservation, table},
    DbPool,
};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn load_tables(&self) -> Result<Vec<Table>>;

    /// Inserts or updates every table in `tables`.
    async fn save_tables(&self, tables: &[Table]) -> Result<()>;

    async fn load_reservations(&self) -> Result<Vec<Reservation>>;

    async fn save_reservation(&self, reservation: &Reservation) -> Result<()>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_reservation(&self, id: Uuid) -> Result<bool>;
}

/// [`BookingStore`] backed by Postgres.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Seeds the catalog when the table is empty. Returns whether it did.
    pub async fn seed_tables_if_empty(&self, tables: &[Table]) -> Result<bool> {
        if table::count_tables(&self.pool).await? > 0 {
            return Ok(false);
        }
        self.save_tables(tables).await?;
        info!("Seeded {} tables", tables.len());
        Ok(true)
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn load_tables(&self) -> Result<Vec<Table>> {
        table::get_tables(&self.pool)
            .await?
            .into_iter()
            .map(DbTable::into_table)
            .collect()
    }

    async fn save_tables(&self, tables: &[Table]) -> Result<()> {
        for t in tables {
            table::upsert_table(&self.pool, &DbTable::from_table(t)?).await?;
        }
        Ok(())
    }

    async fn load_reservations(&self) -> Result<Vec<Reservation>> {
        reservation::get_reservations(&self.pool)
            .await?
            .into_iter()
            .map(DbReservation::into_reservation)
            .collect()
    }

    async fn save_reservation(&self, record: &Reservation) -> Result<()> {
        reservation::upsert_reservation(&self.pool, &DbReservation::from_reservation(record)?).await
    }

    async fn delete_reservation(&self, id: Uuid) -> Result<bool> {
        reservation::delete_reservation(&self.pool, id).await
    }
}
