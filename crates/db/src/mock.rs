use async_trait::async_trait;
use mockall::mock;
use seatplan_core::models::{reservation::Reservation, table::Table};
use uuid::Uuid;

use crate::store::BookingStore;

// Mock store for handler tests
mock! {
    pub BookingStore {}

    #[async_trait]
    impl BookingStore for BookingStore {
        async fn load_tables(&self) -> eyre::Result<Vec<Table>>;

        async fn save_tables(&self, tables: &[Table]) -> eyre::Result<()>;

        async fn load_reservations(&self) -> eyre::Result<Vec<Reservation>>;

        async fn save_reservation(&self, reservation: &Reservation) -> eyre::Result<()>;

        async fn delete_reservation(&self, id: Uuid) -> eyre::Result<bool>;
    }
}
