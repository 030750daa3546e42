/// Table availability for a party at a slot
pub mod availability;
/// Reservation lifecycle endpoints
pub mod reservation;
/// Table catalog
pub mod table;
