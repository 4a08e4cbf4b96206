//! The `ParkingStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `corral-store-sqlite`).
//! Higher layers (`corral-api`, `corral-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  person::{NewPerson, Person},
  stay::{CheckInOutcome, CheckOutOutcome, NewCheckIn, Stay},
  vehicle::{NewVehicle, Vehicle},
};

/// Abstraction over a parking-register backend.
///
/// The ledger invariant — at most one active stay per ID number — is upheld
/// atomically inside the store; callers never pre-check it with a read.
/// Every write takes `now` from the caller, captured once at the operation
/// boundary: the store reads no ambient clock, and client-supplied
/// timestamps are never accepted.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ParkingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identity registry ─────────────────────────────────────────────────

  /// Exact-match lookup by ID number. Returns `None` if never registered.
  fn find_person<'a>(
    &'a self,
    id_number: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Upsert keyed on `id_number`: registers the person with
  /// `registered_at = now`, or corrects `display_name` on an existing record
  /// while preserving the original `registered_at`.
  fn register_person(
    &self,
    input: NewPerson,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Vehicle catalog ───────────────────────────────────────────────────

  /// Every vehicle ever registered for a person, in registration order.
  fn list_vehicles<'a>(
    &'a self,
    owner_id_number: &'a str,
  ) -> impl Future<Output = Result<Vec<Vehicle>, Self::Error>> + Send + 'a;

  /// Append a vehicle to a person's catalog. Always inserts — duplicates are
  /// allowed — and fails if the owner was never registered.
  fn register_vehicle(
    &self,
    input: NewVehicle,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vehicle, Self::Error>> + Send + '_;

  // ── Stay ledger ───────────────────────────────────────────────────────

  /// Open a stay for `input.id_number` at `now`.
  ///
  /// Atomic against the one-active-stay invariant: when an open stay already
  /// exists, nothing is written and the outcome is
  /// [`CheckInOutcome::AlreadyParked`] carrying it.
  fn check_in(
    &self,
    input: NewCheckIn,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<CheckInOutcome, Self::Error>> + Send + '_;

  /// Close the open stay for `id_number` at `now`, computing and persisting
  /// its duration. Reports [`CheckOutOutcome::NotParked`] when there is none,
  /// including when a concurrent session closed it first.
  fn check_out<'a>(
    &'a self,
    id_number: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<CheckOutOutcome, Self::Error>> + Send + 'a;

  /// The open stay for `id_number`, if any.
  fn find_active_stay<'a>(
    &'a self,
    id_number: &'a str,
  ) -> impl Future<Output = Result<Option<Stay>, Self::Error>> + Send + 'a;

  // ── Views ─────────────────────────────────────────────────────────────

  /// All open stays in display order: scooters before bicycles, then
  /// check-in time ascending, then stay ID. The order is total, so repeated
  /// reads of an unchanged ledger return identical sequences.
  fn list_active(
    &self,
  ) -> impl Future<Output = Result<Vec<Stay>, Self::Error>> + Send + '_;

  /// The `limit` most recently closed stays, most recent first.
  fn list_recent_closed(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Stay>, Self::Error>> + Send + '_;
}
