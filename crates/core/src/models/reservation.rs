use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::slot::{self, Slot},
};

pub const MIN_PARTY_SIZE: u32 = 1;
pub const MAX_PARTY_SIZE: u32 = 20;

/// Where a reservation is in its lifecycle.
///
/// ```text
/// confirmed ──► seated ──► completed
///     │
///     └──────► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Seated,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Confirmed,
        ReservationStatus::Seated,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    ];

    /// Active reservations hold their table for the slot.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Confirmed | ReservationStatus::Seated)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// The only transition table in the system. Callers never flip status
    /// fields directly.
    pub fn can_transition_to(self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            (Confirmed, Seated) | (Confirmed, Cancelled) | (Seated, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "seated" => Ok(ReservationStatus::Seated),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(BookingError::Validation(format!(
                "Unknown reservation status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "slot::hhmm")]
    pub time: NaiveTime,
    pub party_size: u32,
    pub table_id: Option<u32>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True when this reservation currently claims `table_id` at `slot`.
    pub fn claims(&self, table_id: u32, slot: Slot) -> bool {
        self.is_active() && self.table_id == Some(table_id) && self.slot() == slot
    }
}

/// Raw booking form as received from a caller. Nothing here is trusted
/// until [`CreateReservationRequest::validate`] has run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub table_id: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl CreateReservationRequest {
    pub fn validate(&self) -> BookingResult<NewReservation> {
        let customer_name = required(&self.customer_name, "customer name")?;
        let customer_phone = required(&self.customer_phone, "customer phone")?;
        let customer_email = validate_email(self.customer_email.as_deref())?;

        let date = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => slot::parse_date(raw)?,
            _ => return Err(BookingError::Validation("date is required".to_string())),
        };
        let time = match self.time.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => slot::parse_time(raw)?,
            _ => return Err(BookingError::Validation("time is required".to_string())),
        };
        let party_size = match self.party_size {
            Some(size) => validate_party_size(size)?,
            None => return Err(BookingError::Validation("party size is required".to_string())),
        };

        Ok(NewReservation {
            customer_name,
            customer_phone,
            customer_email,
            date,
            time,
            party_size,
            table_id: self.table_id,
            notes: optional_text(self.notes.as_deref()),
            special_requests: optional_text(self.special_requests.as_deref()),
        })
    }
}

/// A booking that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub(crate) customer_name: String,
    pub(crate) customer_phone: String,
    pub(crate) customer_email: Option<String>,
    pub(crate) date: NaiveDate,
    pub(crate) time: NaiveTime,
    pub(crate) party_size: u32,
    pub(crate) table_id: Option<u32>,
    pub(crate) notes: Option<String>,
    pub(crate) special_requests: Option<String>,
}

impl NewReservation {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn table_id(&self) -> Option<u32> {
        self.table_id
    }
}

/// Partial edit of a reservation. Absent fields are left unchanged; an
/// empty string clears an optional text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl UpdateReservationRequest {
    pub fn validate(&self) -> BookingResult<ReservationUpdate> {
        Ok(ReservationUpdate {
            customer_name: self
                .customer_name
                .as_deref()
                .map(|name| required(name, "customer name"))
                .transpose()?,
            customer_phone: self
                .customer_phone
                .as_deref()
                .map(|phone| required(phone, "customer phone"))
                .transpose()?,
            customer_email: self
                .customer_email
                .as_deref()
                .map(|email| validate_email(Some(email)))
                .transpose()?,
            date: self.date.as_deref().map(slot::parse_date).transpose()?,
            time: self.time.as_deref().map(slot::parse_time).transpose()?,
            party_size: self.party_size.map(validate_party_size).transpose()?,
            notes: self.notes.as_deref().map(|n| optional_text(Some(n))),
            special_requests: self
                .special_requests
                .as_deref()
                .map(|s| optional_text(Some(s))),
        })
    }
}

/// A validated partial edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationUpdate {
    pub(crate) customer_name: Option<String>,
    pub(crate) customer_phone: Option<String>,
    pub(crate) customer_email: Option<Option<String>>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) time: Option<NaiveTime>,
    pub(crate) party_size: Option<u32>,
    pub(crate) notes: Option<Option<String>>,
    pub(crate) special_requests: Option<Option<String>>,
}

impl ReservationUpdate {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Returns `reservation` with the edit applied. Does not check tables.
    pub(crate) fn apply_to(&self, reservation: &Reservation) -> Reservation {
        let mut updated = reservation.clone();
        if let Some(name) = &self.customer_name {
            updated.customer_name = name.clone();
        }
        if let Some(phone) = &self.customer_phone {
            updated.customer_phone = phone.clone();
        }
        if let Some(email) = &self.customer_email {
            updated.customer_email = email.clone();
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(time) = self.time {
            updated.time = time;
        }
        if let Some(party_size) = self.party_size {
            updated.party_size = party_size;
        }
        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }
        if let Some(special_requests) = &self.special_requests {
            updated.special_requests = special_requests.clone();
        }
        updated.updated_at = Utc::now();
        updated
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTableRequest {
    pub table_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: ReservationStatus,
}

/// Per-day counts shown on the reservations dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStats {
    pub date: Option<NaiveDate>,
    pub total: usize,
    pub confirmed: usize,
    pub seated: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Guests across every reservation of the day, cancelled ones included.
    pub total_guests: u32,
}

impl ReservationStats {
    pub fn record(&mut self, reservation: &Reservation) {
        self.total += 1;
        match reservation.status {
            ReservationStatus::Confirmed => self.confirmed += 1,
            ReservationStatus::Seated => self.seated += 1,
            ReservationStatus::Completed => self.completed += 1,
            ReservationStatus::Cancelled => self.cancelled += 1,
        }
        self.total_guests += reservation.party_size;
    }
}

pub fn validate_party_size(size: u32) -> BookingResult<u32> {
    if (MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(BookingError::Validation(format!(
            "party size must be between {} and {}, got {}",
            MIN_PARTY_SIZE, MAX_PARTY_SIZE, size
        )))
    }
}

fn required(value: &str, field: &str) -> BookingResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(BookingError::Validation(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_email(value: Option<&str>) -> BookingResult<Option<String>> {
    match optional_text(value) {
        Some(email) if !email.contains('@') => Err(BookingError::Validation(format!(
            "'{}' is not a valid email address",
            email
        ))),
        other => Ok(other),
    }
}
