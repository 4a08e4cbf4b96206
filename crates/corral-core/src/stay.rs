//! Stays — one check-in-to-check-out record in the parking ledger.
//!
//! A stay is created active and transitions exactly once to closed; it is
//! never deleted and never reopened. Person and vehicle fields are
//! denormalised copies taken at check-in, so a stay reads the same forever.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vehicle::VehicleSnapshot;

/// Lifecycle state of a stay. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StayStatus {
  Active,
  Closed,
}

impl StayStatus {
  pub fn is_active(&self) -> bool {
    matches!(self, Self::Active)
  }
}

/// One parking stay. `status` always agrees with `checked_out_at`: a stay is
/// `Active` exactly when `checked_out_at` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
  pub stay_id:          Uuid,
  /// The parker's ID number, copied at check-in.
  pub id_number:        String,
  /// The parker's display name, copied at check-in.
  pub person_name:      String,
  /// The selected vehicle, copied at check-in.
  pub vehicle:          VehicleSnapshot,
  pub checked_in_at:    DateTime<Utc>,
  pub checked_out_at:   Option<DateTime<Utc>>,
  pub status:           StayStatus,
  /// Elapsed time rendered for display, computed once at close.
  pub duration_text:    Option<String>,
  /// Whole elapsed minutes, computed once at close.
  pub duration_minutes: Option<i64>,
}

/// Input to [`ParkingStore::check_in`](crate::store::ParkingStore::check_in).
///
/// The caller resolves the person and the chosen catalog vehicle and passes
/// their frozen copies here; `stay_id` and `checked_in_at` are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
  pub id_number:   String,
  pub person_name: String,
  pub vehicle:     VehicleSnapshot,
}

// ─── Outcomes ─────────────────────────────────────────────────────────────────

/// Result of a check-in attempt. A rejected attempt is an expected outcome of
/// the at-most-one-active-stay rule, not a storage error, so it is carried in
/// the `Ok` channel.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
  /// A new active stay was opened.
  CheckedIn(Stay),
  /// The ID number already has an open stay. Carries that stay so callers
  /// can describe the parked vehicle and offer a check-out instead.
  AlreadyParked(Stay),
}

/// Result of a check-out attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutOutcome {
  /// The open stay was closed; its duration fields are now populated.
  CheckedOut(Stay),
  /// No open stay exists for the ID number. Nothing was changed.
  NotParked,
}
