//! Vehicles — the per-person catalog of things that can be parked.
//!
//! The catalog is append-only: a person may register any number of vehicles
//! over time (duplicates included) and picks one at check-in. Entries are
//! never edited or deleted; a changed vehicle is simply registered again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The kind of vehicle. Variant order is display order: scooters group ahead
/// of bicycles in every view, so the derived `Ord` is load-bearing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
  Scooter,
  Bicycle,
}

impl VehicleKind {
  /// Capitalised label used in tabular views.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Scooter => "Scooter",
      Self::Bicycle => "Bicycle",
    }
  }
}

/// A vehicle registered to a person. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
  pub vehicle_id:       Uuid,
  pub owner_id_number:  String,
  pub kind:             VehicleKind,
  /// Brand and reference or model, free text (e.g. "Xiaomi Pro2").
  pub brand_reference:  String,
  /// Colour or other distinguishing marks.
  pub color:            Option<String>,
  /// The lock or chain left with the vehicle, if any.
  pub lock_description: Option<String>,
  /// Set by the store; gives the catalog its listing order.
  pub registered_at:    DateTime<Utc>,
}

impl Vehicle {
  /// The denormalised copy written onto a stay at check-in.
  pub fn snapshot(&self) -> VehicleSnapshot {
    VehicleSnapshot {
      kind:             self.kind,
      brand_reference:  self.brand_reference.clone(),
      color:            self.color.clone(),
      lock_description: self.lock_description.clone(),
    }
  }
}

/// The vehicle attributes frozen onto a [`Stay`](crate::stay::Stay) at
/// check-in. A stay record must keep describing what was actually parked,
/// independent of whatever the catalog holds later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
  pub kind:             VehicleKind,
  pub brand_reference:  String,
  pub color:            Option<String>,
  pub lock_description: Option<String>,
}

/// Input to [`ParkingStore::register_vehicle`](crate::store::ParkingStore::register_vehicle).
/// The `vehicle_id` and `registered_at` fields are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVehicle {
  pub owner_id_number:  String,
  pub kind:             VehicleKind,
  pub brand_reference:  String,
  pub color:            Option<String>,
  pub lock_description: Option<String>,
}

impl NewVehicle {
  /// Presence-only validation. Colour and lock are optional by design;
  /// duplicate entries are allowed.
  pub fn validate(&self) -> Result<()> {
    if self.owner_id_number.trim().is_empty() {
      return Err(Error::MissingField("owner_id_number"));
    }
    if self.brand_reference.trim().is_empty() {
      return Err(Error::MissingField("brand_reference"));
    }
    Ok(())
  }
}
