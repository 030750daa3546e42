pub mod reservation;
pub mod table;
