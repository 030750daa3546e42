//! # Seatplan Core
//!
//! Domain types and the reservation-to-table assignment logic for the
//! Seatplan restaurant service.
//!
//! ## Layout
//!
//! - **Models**: tables, reservations, slots and the request types that
//!   validate caller input at the boundary
//! - **Scheduler**: availability, table assignment and the status lifecycle
//!   for one service period
//! - **Book**: one scheduler per service date, each behind its own lock
//! - **Seed**: the demo dining room used when no database is configured

/// Reservation book partitioned by service date
pub mod book;
/// Error taxonomy shared by every crate in the workspace
pub mod errors;
/// Domain models and boundary request types
pub mod models;
/// Reservation scheduler for a single service period
pub mod scheduler;
/// Demo catalog and reservations
pub mod seed;

pub use book::ReservationBook;
pub use errors::{BookingError, BookingResult};
pub use scheduler::ReservationScheduler;
