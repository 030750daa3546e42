//! Shared application state and the startup path that fills it.

use chrono::Utc;
use eyre::{eyre, Result};
use seatplan_core::{
    errors::{BookingError, BookingResult},
    models::{reservation::Reservation, table::TableCatalog},
    seed, ReservationBook,
};
use seatplan_db::{BookingStore, PgBookingStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{config::ApiConfig, middleware::error_handling::AppError};

/// Shared application state that is accessible to all request handlers
///
/// The book is the source of truth while the process runs. When a store is
/// configured, handlers write every successful mutation through to it.
/// Mutations go through [`ApiState::commit`] and [`ApiState::remove`], which
/// hold `write_lock` until the store has the result, so store writes land
/// in the same order as the book changes.
pub struct ApiState {
    /// Reservations and table catalog, one lock per service date
    pub book: ReservationBook,
    /// Persistence collaborator, if any
    pub store: Option<Arc<dyn BookingStore>>,
    write_lock: tokio::sync::Mutex<()>,
}

impl ApiState {
    pub fn in_memory(book: ReservationBook) -> Self {
        Self {
            book,
            store: None,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_store(book: ReservationBook, store: Arc<dyn BookingStore>) -> Self {
        Self {
            book,
            store: Some(store),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Applies `op` to the book and writes the changed reservation through.
    pub async fn commit<F>(&self, op: F) -> Result<Reservation, AppError>
    where
        F: FnOnce(&ReservationBook) -> BookingResult<Reservation>,
    {
        let _guard = self.write_lock.lock().await;
        let reservation = op(&self.book)?;
        self.persist(&reservation).await?;
        Ok(reservation)
    }

    /// Deletes a reservation from the book and then from the store.
    pub async fn remove(&self, id: Uuid) -> Result<Reservation, AppError> {
        let _guard = self.write_lock.lock().await;
        let removed = self.book.delete(id)?;
        self.forget(id).await?;
        Ok(removed)
    }

    async fn persist(&self, reservation: &Reservation) -> Result<(), AppError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save_reservation(reservation).await.map_err(|e| {
            error!(reservation_id = %reservation.id, "failed to save reservation: {:#}", e);
            AppError(BookingError::Database(e))
        })
    }

    async fn forget(&self, id: Uuid) -> Result<(), AppError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        match store.delete_reservation(id).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(reservation_id = %id, "deleted reservation was not in the store");
                Ok(())
            }
            Err(e) => {
                error!(reservation_id = %id, "failed to delete reservation: {:#}", e);
                Err(AppError(BookingError::Database(e)))
            }
        }
    }
}

/// Loads the catalog and reservations from a store into a fresh book.
pub async fn load_book(store: &dyn BookingStore) -> Result<ReservationBook> {
    let tables = store.load_tables().await?;
    if tables.is_empty() {
        return Err(eyre!(
            "No tables in the catalog; run db-migrate or set SEED_DEMO_DATA=true"
        ));
    }
    let catalog = TableCatalog::new(tables)?;
    let reservations = store.load_reservations().await?;
    Ok(ReservationBook::with_reservations(catalog, reservations)?)
}

/// Builds the state described by `config`: Postgres-backed when a database
/// URL is set, in memory otherwise.
pub async fn build_state(config: &ApiConfig) -> Result<ApiState> {
    match &config.database_url {
        Some(url) => {
            let pool = seatplan_db::create_pool(url).await?;
            seatplan_db::schema::initialize_database(&pool).await?;
            let store = PgBookingStore::new(pool);
            if config.seed_demo_data {
                store.seed_tables_if_empty(&seed::demo_tables()).await?;
            }
            let book = load_book(&store).await?;
            info!("Reservation book loaded from database");
            Ok(ApiState::with_store(book, Arc::new(store)))
        }
        None => {
            let book = if config.seed_demo_data {
                let today = Utc::now().date_naive();
                ReservationBook::with_reservations(
                    seed::demo_catalog()?,
                    seed::demo_reservations(today),
                )?
            } else {
                warn!("No database and no demo data: the table catalog is empty");
                ReservationBook::new(TableCatalog::default())
            };
            info!("Reservation book running in memory");
            Ok(ApiState::in_memory(book))
        }
    }
}
