//! # Reservation Book
//!
//! Owns one [`ReservationScheduler`] per service date, each behind its own
//! `RwLock`. Mutations take the write lock of the date they touch, so two
//! writers on the same evening never act on a stale set of claimed tables,
//! while different dates proceed independently. Readers share the lock and
//! always see a whole update or none of it.
//!
//! Lock order is: the period map, then period locks in ascending date order,
//! then the id index. The index is only written while the owning period is
//! write-locked, and no lock is held across I/O.

use chrono::{NaiveDate, NaiveTime};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        reservation::{
            NewReservation, Reservation, ReservationStats, ReservationStatus, ReservationUpdate,
        },
        table::{Table, TableCatalog},
    },
    scheduler::ReservationScheduler,
};

/// A reservation can move between dates while a caller is routing to it;
/// routing retries this many times before reporting it missing.
const MAX_ROUTE_ATTEMPTS: usize = 3;

type Period = Arc<RwLock<ReservationScheduler>>;

pub struct ReservationBook {
    catalog: Arc<TableCatalog>,
    periods: RwLock<BTreeMap<NaiveDate, Period>>,
    index: RwLock<HashMap<Uuid, NaiveDate>>,
}

impl ReservationBook {
    pub fn new(catalog: TableCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            periods: RwLock::new(BTreeMap::new()),
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a book from stored records, grouping them by date.
    pub fn with_reservations(
        catalog: TableCatalog,
        reservations: impl IntoIterator<Item = Reservation>,
    ) -> BookingResult<Self> {
        let catalog = Arc::new(catalog);
        let mut by_date: BTreeMap<NaiveDate, Vec<Reservation>> = BTreeMap::new();
        for reservation in reservations {
            by_date.entry(reservation.date).or_default().push(reservation);
        }

        let mut periods = BTreeMap::new();
        let mut index = HashMap::new();
        for (date, records) in by_date {
            for record in &records {
                if index.insert(record.id, date).is_some() {
                    return Err(BookingError::Conflict(format!(
                        "Reservation {} appears more than once",
                        record.id
                    )));
                }
            }
            let scheduler = ReservationScheduler::with_reservations(catalog.clone(), records)?;
            periods.insert(date, Arc::new(RwLock::new(scheduler)));
        }

        info!(
            tables = catalog.len(),
            reservations = index.len(),
            periods = periods.len(),
            "reservation book loaded"
        );
        Ok(Self {
            catalog,
            periods: RwLock::new(periods),
            index: RwLock::new(index),
        })
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn available_tables(
        &self,
        party_size: u32,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> BookingResult<Vec<Table>> {
        match self.existing_period(date)? {
            Some(period) => {
                let scheduler = read(&period)?;
                Ok(scheduler.available_tables(party_size, date, time, exclude))
            }
            None => Ok(self
                .catalog
                .iter()
                .filter(|table| table.seats(party_size))
                .cloned()
                .collect()),
        }
    }

    pub fn create(&self, new: NewReservation) -> BookingResult<Reservation> {
        let date = new.date();
        let period = self.period(date)?;
        let mut scheduler = write(&period)?;
        let reservation = scheduler.create(new)?;
        write(&self.index)?.insert(reservation.id, date);
        Ok(reservation)
    }

    pub fn get(&self, id: Uuid) -> BookingResult<Reservation> {
        for _ in 0..MAX_ROUTE_ATTEMPTS {
            let Some(period) = self.route(id)? else {
                continue;
            };
            let scheduler = read(&period)?;
            if let Ok(reservation) = scheduler.get(id) {
                return Ok(reservation.clone());
            }
        }
        Err(not_found(id))
    }

    /// Reservations on `date`, ordered by time.
    pub fn reservations_on(&self, date: NaiveDate) -> BookingResult<Vec<Reservation>> {
        match self.existing_period(date)? {
            Some(period) => {
                let scheduler = read(&period)?;
                Ok(scheduler.reservations().into_iter().cloned().collect())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Every reservation in the book, ordered by date then time.
    pub fn all_reservations(&self) -> BookingResult<Vec<Reservation>> {
        let periods: Vec<Period> = read(&self.periods)?.values().cloned().collect();
        let mut all = Vec::new();
        for period in periods {
            all.extend(read(&period)?.reservations().into_iter().cloned());
        }
        Ok(all)
    }

    pub fn stats_on(&self, date: NaiveDate) -> BookingResult<ReservationStats> {
        match self.existing_period(date)? {
            Some(period) => {
                let scheduler = read(&period)?;
                Ok(scheduler.stats(date))
            }
            None => Ok(ReservationStats {
                date: Some(date),
                ..ReservationStats::default()
            }),
        }
    }

    pub fn assign_table(&self, id: Uuid, table_id: u32) -> BookingResult<Reservation> {
        self.with_period_mut(id, |scheduler| scheduler.assign_table(id, table_id))
    }

    pub fn unassign_table(&self, id: Uuid) -> BookingResult<Reservation> {
        self.with_period_mut(id, |scheduler| scheduler.unassign_table(id))
    }

    pub fn advance_status(
        &self,
        id: Uuid,
        target: ReservationStatus,
    ) -> BookingResult<Reservation> {
        self.with_period_mut(id, |scheduler| scheduler.advance_status(id, target))
    }

    pub fn cancel(&self, id: Uuid) -> BookingResult<Reservation> {
        self.with_period_mut(id, |scheduler| scheduler.cancel(id))
    }

    /// Applies an edit, moving the reservation to another period when the
    /// date changes.
    pub fn update_details(&self, id: Uuid, update: &ReservationUpdate) -> BookingResult<Reservation> {
        for _ in 0..MAX_ROUTE_ATTEMPTS {
            let Some(from) = self.date_of(id)? else {
                return Err(not_found(id));
            };
            let to = update.date().unwrap_or(from);
            if to == from {
                let Some(period) = self.existing_period(from)? else {
                    continue;
                };
                let mut scheduler = write(&period)?;
                if !scheduler.contains(id) {
                    continue;
                }
                return scheduler.update_details(id, update);
            }

            let source = self.existing_period(from)?;
            let target = self.period(to)?;
            let Some(source) = source else {
                continue;
            };

            // Ascending date order keeps two opposite moves from deadlocking.
            let (mut source_guard, mut target_guard) = if from < to {
                let s = write(&source)?;
                let t = write(&target)?;
                (s, t)
            } else {
                let t = write(&target)?;
                let s = write(&source)?;
                (s, t)
            };
            if !source_guard.contains(id) {
                continue;
            }

            let updated = source_guard.preview_update(id, update)?;
            target_guard.admit(updated.clone())?;
            source_guard.delete(id)?;
            write(&self.index)?.insert(id, to);
            info!(reservation_id = %id, %from, %to, "reservation moved to another date");
            return Ok(updated);
        }
        Err(not_found(id))
    }

    /// Removes a reservation whatever its status.
    pub fn delete(&self, id: Uuid) -> BookingResult<Reservation> {
        self.with_period_mut(id, |scheduler| {
            let removed = scheduler.delete(id)?;
            write(&self.index)?.remove(&id);
            Ok(removed)
        })
    }

    fn with_period_mut<T>(
        &self,
        id: Uuid,
        mut op: impl FnMut(&mut ReservationScheduler) -> BookingResult<T>,
    ) -> BookingResult<T> {
        for _ in 0..MAX_ROUTE_ATTEMPTS {
            let Some(period) = self.route(id)? else {
                continue;
            };
            let mut scheduler = write(&period)?;
            if scheduler.contains(id) {
                return op(&mut *scheduler);
            }
            debug!(reservation_id = %id, "reservation moved while routing, retrying");
        }
        Err(not_found(id))
    }

    /// Finds the period that should own `id`.
    ///
    /// `Ok(None)` means the index and periods disagreed, which only happens
    /// mid-move; callers retry.
    fn route(&self, id: Uuid) -> BookingResult<Option<Period>> {
        let date = self.date_of(id)?.ok_or_else(|| not_found(id))?;
        self.existing_period(date)
    }

    fn date_of(&self, id: Uuid) -> BookingResult<Option<NaiveDate>> {
        Ok(read(&self.index)?.get(&id).copied())
    }

    fn existing_period(&self, date: NaiveDate) -> BookingResult<Option<Period>> {
        Ok(read(&self.periods)?.get(&date).cloned())
    }

    fn period(&self, date: NaiveDate) -> BookingResult<Period> {
        if let Some(period) = self.existing_period(date)? {
            return Ok(period);
        }
        let mut periods = write(&self.periods)?;
        let period = periods.entry(date).or_insert_with(|| {
            debug!(%date, "opening service period");
            Arc::new(RwLock::new(ReservationScheduler::new(self.catalog.clone())))
        });
        Ok(period.clone())
    }
}

fn not_found(id: Uuid) -> BookingError {
    BookingError::NotFound(format!("Reservation with ID {} not found", id))
}

fn read<T>(lock: &RwLock<T>) -> BookingResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| BookingError::Internal("reservation book lock poisoned".into()))
}

fn write<T>(lock: &RwLock<T>) -> BookingResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| BookingError::Internal("reservation book lock poisoned".into()))
}
