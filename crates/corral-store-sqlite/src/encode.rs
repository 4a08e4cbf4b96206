//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings, which order correctly
//! under SQLite's lexicographic TEXT comparison. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use corral_core::{
  person::Person,
  stay::{Stay, StayStatus},
  vehicle::{Vehicle, VehicleKind, VehicleSnapshot},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── VehicleKind ──────────────────────────────────────────────────────────────

pub fn encode_vehicle_kind(k: VehicleKind) -> &'static str {
  match k {
    VehicleKind::Scooter => "scooter",
    VehicleKind::Bicycle => "bicycle",
  }
}

pub fn decode_vehicle_kind(s: &str) -> Result<VehicleKind> {
  match s {
    "scooter" => Ok(VehicleKind::Scooter),
    "bicycle" => Ok(VehicleKind::Bicycle),
    other => Err(Error::Decode(format!("unknown vehicle kind: {other:?}"))),
  }
}

// ─── StayStatus ───────────────────────────────────────────────────────────────

pub fn encode_stay_status(s: StayStatus) -> &'static str {
  match s {
    StayStatus::Active => "active",
    StayStatus::Closed => "closed",
  }
}

pub fn decode_stay_status(s: &str) -> Result<StayStatus> {
  match s {
    "active" => Ok(StayStatus::Active),
    "closed" => Ok(StayStatus::Closed),
    other => Err(Error::Decode(format!("unknown stay status: {other:?}"))),
  }
}

// ─── Row types ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub id_number:     String,
  pub display_name:  String,
  pub registered_at: String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id_number:     self.id_number,
      display_name:  self.display_name,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}

/// Raw strings read directly from a `vehicles` row.
pub struct RawVehicle {
  pub vehicle_id:       String,
  pub owner_id_number:  String,
  pub kind:             String,
  pub brand_reference:  String,
  pub color:            Option<String>,
  pub lock_description: Option<String>,
  pub registered_at:    String,
}

impl RawVehicle {
  pub fn into_vehicle(self) -> Result<Vehicle> {
    Ok(Vehicle {
      vehicle_id:       decode_uuid(&self.vehicle_id)?,
      owner_id_number:  self.owner_id_number,
      kind:             decode_vehicle_kind(&self.kind)?,
      brand_reference:  self.brand_reference,
      color:            self.color,
      lock_description: self.lock_description,
      registered_at:    decode_dt(&self.registered_at)?,
    })
  }
}

/// Raw strings read directly from a `stays` row.
pub struct RawStay {
  pub stay_id:          String,
  pub id_number:        String,
  pub person_name:      String,
  pub vehicle_kind:     String,
  pub vehicle_brand:    String,
  pub vehicle_color:    Option<String>,
  pub lock_description: Option<String>,
  pub checked_in_at:    String,
  pub checked_out_at:   Option<String>,
  pub status:           String,
  pub duration_text:    Option<String>,
  pub duration_minutes: Option<i64>,
}

impl RawStay {
  pub fn into_stay(self) -> Result<Stay> {
    Ok(Stay {
      stay_id:          decode_uuid(&self.stay_id)?,
      id_number:        self.id_number,
      person_name:      self.person_name,
      vehicle:          VehicleSnapshot {
        kind:             decode_vehicle_kind(&self.vehicle_kind)?,
        brand_reference:  self.vehicle_brand,
        color:            self.vehicle_color,
        lock_description: self.lock_description,
      },
      checked_in_at:    decode_dt(&self.checked_in_at)?,
      checked_out_at:   self
        .checked_out_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      status:           decode_stay_status(&self.status)?,
      duration_text:    self.duration_text,
      duration_minutes: self.duration_minutes,
    })
  }
}
