//! Persons — the identity registry, keyed by national ID number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A registered person. The ID number is the natural key; there is no
/// surrogate identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id_number:     String,
  pub display_name:  String,
  /// Set by the store at first registration and preserved across upserts.
  pub registered_at: DateTime<Utc>,
}

/// Input to [`ParkingStore::register_person`](crate::store::ParkingStore::register_person).
///
/// Registration is an upsert: re-registering an existing ID number corrects
/// the display name and changes nothing else.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub id_number:    String,
  pub display_name: String,
}

impl NewPerson {
  pub fn new(id_number: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self {
      id_number:    id_number.into(),
      display_name: display_name.into(),
    }
  }

  /// Presence-only validation, mirroring what the intake form enforces.
  /// Whitespace-only values count as missing.
  pub fn validate(&self) -> Result<()> {
    if self.id_number.trim().is_empty() {
      return Err(Error::MissingField("id_number"));
    }
    if self.display_name.trim().is_empty() {
      return Err(Error::MissingField("display_name"));
    }
    Ok(())
  }
}
