//! # Reservation Scheduler
//!
//! Answers "which tables can seat this party at this slot" and mutates
//! reservations without breaking the booking invariants:
//!
//! 1. An assigned table always seats the whole party
//! 2. No two active reservations hold the same table at the same slot
//! 3. Status only moves forward along `confirmed → seated → completed` or
//!    `confirmed → cancelled`
//! 4. A `seated` reservation always has a table
//!
//! Cancelling or completing a reservation keeps its table id as history but
//! releases the claim, so the table is offered again for that slot.

use chrono::{NaiveDate, NaiveTime, Utc};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        reservation::{
            self, NewReservation, Reservation, ReservationStats, ReservationStatus,
            ReservationUpdate,
        },
        slot::Slot,
        table::{Table, TableCatalog},
    },
};

/// Reservations of one service period over a shared table catalog.
#[derive(Debug, Clone)]
pub struct ReservationScheduler {
    catalog: Arc<TableCatalog>,
    reservations: HashMap<Uuid, Reservation>,
}

impl ReservationScheduler {
    pub fn new(catalog: Arc<TableCatalog>) -> Self {
        Self {
            catalog,
            reservations: HashMap::new(),
        }
    }

    /// Builds a scheduler from existing records, rejecting any record that
    /// would break an invariant.
    pub fn with_reservations(
        catalog: Arc<TableCatalog>,
        reservations: impl IntoIterator<Item = Reservation>,
    ) -> BookingResult<Self> {
        let mut scheduler = Self::new(catalog);
        for reservation in reservations {
            scheduler.admit(reservation)?;
        }
        Ok(scheduler)
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.reservations.contains_key(&id)
    }

    pub fn get(&self, id: Uuid) -> BookingResult<&Reservation> {
        self.reservations.get(&id).ok_or_else(|| reservation_not_found(id))
    }

    /// All reservations, ordered by date, time and creation.
    pub fn reservations(&self) -> Vec<&Reservation> {
        let mut all: Vec<&Reservation> = self.reservations.values().collect();
        all.sort_by(|a, b| {
            (a.date, a.time, a.created_at, a.id).cmp(&(b.date, b.time, b.created_at, b.id))
        });
        all
    }

    /// Table ids held by active reservations at the slot.
    pub fn claimed_tables(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> BTreeSet<u32> {
        let slot = Slot::new(date, time);
        self.reservations
            .values()
            .filter(|r| r.is_active() && r.slot() == slot && Some(r.id) != exclude)
            .filter_map(|r| r.table_id)
            .collect()
    }

    /// Tables that can seat `party_size` at the slot, ascending by id.
    ///
    /// `exclude` names a reservation being edited so it does not conflict
    /// with itself. A party larger than every table yields an empty list.
    pub fn available_tables(
        &self,
        party_size: u32,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Vec<Table> {
        let claimed = self.claimed_tables(date, time, exclude);
        let available: Vec<Table> = self
            .catalog
            .iter()
            .filter(|table| table.seats(party_size) && !claimed.contains(&table.id))
            .cloned()
            .collect();

        debug!(
            party_size,
            %date,
            time = %time.format("%H:%M"),
            claimed = claimed.len(),
            available = available.len(),
            "computed table availability"
        );
        available
    }

    pub fn create(&mut self, new: NewReservation) -> BookingResult<Reservation> {
        let slot = new.slot();
        if let Some(table_id) = new.table_id {
            self.check_table(table_id, new.party_size, slot, None)?;
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            customer_email: new.customer_email,
            date: slot.date,
            time: slot.time,
            party_size: new.party_size,
            table_id: new.table_id,
            status: ReservationStatus::Confirmed,
            notes: new.notes,
            special_requests: new.special_requests,
            created_at: now,
            updated_at: now,
        };

        info!(
            reservation_id = %reservation.id,
            slot = %slot,
            party_size = reservation.party_size,
            table_id = ?reservation.table_id,
            "reservation created"
        );
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    /// Inserts an already-built record, checking every invariant.
    pub fn admit(&mut self, reservation: Reservation) -> BookingResult<()> {
        if self.reservations.contains_key(&reservation.id) {
            return Err(BookingError::Conflict(format!(
                "Reservation {} already exists",
                reservation.id
            )));
        }
        reservation::validate_party_size(reservation.party_size)?;
        if reservation.status == ReservationStatus::Seated && reservation.table_id.is_none() {
            return Err(BookingError::Precondition(format!(
                "Reservation {} is seated but has no table",
                reservation.id
            )));
        }
        if let Some(table_id) = reservation.table_id {
            if reservation.is_active() {
                self.check_table(
                    table_id,
                    reservation.party_size,
                    reservation.slot(),
                    Some(reservation.id),
                )?;
            }
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    pub fn assign_table(&mut self, id: Uuid, table_id: u32) -> BookingResult<Reservation> {
        let current = self.get(id)?;
        if current.status.is_terminal() {
            warn!(reservation_id = %id, status = %current.status, "refusing to assign table");
            return Err(BookingError::Precondition(format!(
                "Reservation {} is {} and can no longer be assigned a table",
                id, current.status
            )));
        }
        let (party_size, slot) = (current.party_size, current.slot());
        self.check_table(table_id, party_size, slot, Some(id))?;

        let reservation = self.get_mut(id)?;
        reservation.table_id = Some(table_id);
        reservation.updated_at = Utc::now();
        info!(reservation_id = %id, table_id, slot = %slot, "table assigned");
        Ok(reservation.clone())
    }

    /// Clears the table of a confirmed reservation. A reservation without a
    /// table is returned unchanged.
    pub fn unassign_table(&mut self, id: Uuid) -> BookingResult<Reservation> {
        let reservation = self.get_mut(id)?;
        if reservation.status != ReservationStatus::Confirmed {
            warn!(reservation_id = %id, status = %reservation.status, "refusing to unassign table");
            return Err(BookingError::Precondition(format!(
                "Reservation {} is {} and must keep its table",
                id, reservation.status
            )));
        }
        let Some(table_id) = reservation.table_id.take() else {
            return Ok(reservation.clone());
        };

        reservation.updated_at = Utc::now();
        info!(reservation_id = %id, table_id, "table unassigned");
        Ok(reservation.clone())
    }

    pub fn advance_status(
        &mut self,
        id: Uuid,
        target: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let reservation = self.get_mut(id)?;
        let from = reservation.status;
        if !from.can_transition_to(target) {
            warn!(reservation_id = %id, %from, to = %target, "rejected status transition");
            return Err(BookingError::InvalidTransition { from, to: target });
        }
        if target == ReservationStatus::Seated && reservation.table_id.is_none() {
            return Err(BookingError::Precondition(format!(
                "Reservation {} needs a table before it can be seated",
                id
            )));
        }

        reservation.status = target;
        reservation.updated_at = Utc::now();
        info!(reservation_id = %id, %from, to = %target, "reservation status advanced");
        Ok(reservation.clone())
    }

    pub fn cancel(&mut self, id: Uuid) -> BookingResult<Reservation> {
        self.advance_status(id, ReservationStatus::Cancelled)
    }

    /// Builds the edited record without storing it.
    ///
    /// Only the status and assigned table are checked; the caller checks the
    /// table against whichever period will own the result.
    pub fn preview_update(&self, id: Uuid, update: &ReservationUpdate) -> BookingResult<Reservation> {
        let current = self.get(id)?;
        if current.status.is_terminal() {
            return Err(BookingError::Precondition(format!(
                "Reservation {} is {} and can no longer be edited",
                id, current.status
            )));
        }
        Ok(update.apply_to(current))
    }

    pub fn update_details(
        &mut self,
        id: Uuid,
        update: &ReservationUpdate,
    ) -> BookingResult<Reservation> {
        let updated = self.preview_update(id, update)?;
        if let Some(table_id) = updated.table_id {
            self.check_table(table_id, updated.party_size, updated.slot(), Some(id))?;
        }
        info!(reservation_id = %id, slot = %updated.slot(), "reservation updated");
        self.reservations.insert(id, updated.clone());
        Ok(updated)
    }

    /// Removes a reservation whatever its status.
    pub fn delete(&mut self, id: Uuid) -> BookingResult<Reservation> {
        let removed = self.reservations.remove(&id).ok_or_else(|| reservation_not_found(id))?;
        info!(reservation_id = %id, status = %removed.status, "reservation deleted");
        Ok(removed)
    }

    pub fn stats(&self, date: NaiveDate) -> ReservationStats {
        let mut stats = ReservationStats {
            date: Some(date),
            ..ReservationStats::default()
        };
        for reservation in self.reservations.values().filter(|r| r.date == date) {
            stats.record(reservation);
        }
        stats
    }

    fn get_mut(&mut self, id: Uuid) -> BookingResult<&mut Reservation> {
        self.reservations
            .get_mut(&id)
            .ok_or_else(|| reservation_not_found(id))
    }

    /// Checks that `table_id` exists, seats the party, and is not held at the
    /// slot by an active reservation other than `exclude`.
    fn check_table(
        &self,
        table_id: u32,
        party_size: u32,
        slot: Slot,
        exclude: Option<Uuid>,
    ) -> BookingResult<&Table> {
        let table = self
            .catalog
            .get(table_id)
            .ok_or_else(|| BookingError::NotFound(format!("Table {} not found", table_id)))?;

        if !table.seats(party_size) {
            return Err(BookingError::Capacity(format!(
                "Table {} seats {} but the party has {}",
                table.id, table.capacity, party_size
            )));
        }

        if let Some(holder) = self
            .reservations
            .values()
            .find(|r| Some(r.id) != exclude && r.claims(table_id, slot))
        {
            warn!(table_id, slot = %slot, holder = %holder.id, "table already claimed");
            return Err(BookingError::Conflict(format!(
                "Table {} is already held by reservation {} at {}",
                table_id, holder.id, slot
            )));
        }

        Ok(table)
    }
}

fn reservation_not_found(id: Uuid) -> BookingError {
    BookingError::NotFound(format!("Reservation with ID {} not found", id))
}
