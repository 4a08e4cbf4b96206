//! Read-only display projections over the stay ledger.
//!
//! Localisation happens here and nowhere else: stays carry UTC instants, and
//! these projections render them in the facility's civil timezone just before
//! display. Row order is the order handed to the caller's table widget, so
//! the projections are deterministic end to end.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{duration::StayDuration, stay::Stay};

/// The facility's civil timezone, used wherever a caller does not configure
/// its own.
pub const DEFAULT_DISPLAY_TZ: Tz = chrono_tz::America::Bogota;

/// Localised wall-clock rendering at full precision.
pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
  instant.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Localised wall-clock rendering truncated to the minute, the form used in
/// the summary tables.
pub fn format_local_minute(instant: DateTime<Utc>, tz: Tz) -> String {
  instant.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// One row of the currently-parked table.
///
/// `duration_so_far` is live: it is recomputed against `now` on every render
/// and never persisted. Optional vehicle fields render as empty strings.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ActiveRow {
  pub person_name:      String,
  pub id_number:        String,
  pub kind:             &'static str,
  pub brand_reference:  String,
  pub color:            String,
  pub checked_in:       String,
  pub duration_so_far:  String,
  pub lock_description: String,
}

/// Project active stays into display rows. The input order (scooters first,
/// then check-in time) is preserved as-is.
pub fn active_rows(stays: &[Stay], now: DateTime<Utc>, tz: Tz) -> Vec<ActiveRow> {
  stays
    .iter()
    .map(|stay| ActiveRow {
      person_name:      stay.person_name.clone(),
      id_number:        stay.id_number.clone(),
      kind:             stay.vehicle.kind.label(),
      brand_reference:  stay.vehicle.brand_reference.clone(),
      color:            stay.vehicle.color.clone().unwrap_or_default(),
      checked_in:       format_local_minute(stay.checked_in_at, tz),
      duration_so_far:  StayDuration::between(stay.checked_in_at, now).text(),
      lock_description: stay.vehicle.lock_description.clone().unwrap_or_default(),
    })
    .collect()
}

/// One row of the recent-history table.
///
/// `duration` is the text persisted when the stay closed; `"-"` marks a
/// record closed without one. Other optional fields render as empty strings.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClosedRow {
  pub person_name:      String,
  pub id_number:        String,
  pub kind:             &'static str,
  pub brand_reference:  String,
  pub color:            String,
  pub checked_in:       String,
  pub checked_out:      String,
  pub duration:         String,
  pub lock_description: String,
}

/// Project recently closed stays into display rows, regrouped by vehicle
/// kind: scooters first, and within each kind the incoming most-recent-first
/// order is preserved (the regroup sort is stable).
pub fn closed_rows(stays: &[Stay], tz: Tz) -> Vec<ClosedRow> {
  let mut ordered: Vec<&Stay> = stays.iter().collect();
  ordered.sort_by_key(|stay| stay.vehicle.kind);
  ordered
    .into_iter()
    .map(|stay| ClosedRow {
      person_name:      stay.person_name.clone(),
      id_number:        stay.id_number.clone(),
      kind:             stay.vehicle.kind.label(),
      brand_reference:  stay.vehicle.brand_reference.clone(),
      color:            stay.vehicle.color.clone().unwrap_or_default(),
      checked_in:       format_local_minute(stay.checked_in_at, tz),
      checked_out:      stay
        .checked_out_at
        .map(|at| format_local_minute(at, tz))
        .unwrap_or_default(),
      duration:         stay.duration_text.clone().unwrap_or_else(|| "-".into()),
      lock_description: stay.vehicle.lock_description.clone().unwrap_or_default(),
    })
    .collect()
}
