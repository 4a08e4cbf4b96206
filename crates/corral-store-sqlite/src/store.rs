//! [`SqliteStore`] — the SQLite implementation of [`ParkingStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use corral_core::{
  duration::StayDuration,
  person::{NewPerson, Person},
  stay::{CheckInOutcome, CheckOutOutcome, NewCheckIn, Stay, StayStatus},
  store::ParkingStore,
  vehicle::{NewVehicle, Vehicle},
};

use crate::{
  encode::{
    encode_dt, encode_stay_status, encode_uuid, encode_vehicle_kind,
    RawPerson, RawStay, RawVehicle,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

/// Column list shared by every query that reads whole stay rows, in the order
/// [`row_to_stay`] expects.
const STAY_COLUMNS: &str = "stay_id, id_number, person_name, vehicle_kind, \
   vehicle_brand, vehicle_color, lock_description, checked_in_at, \
   checked_out_at, status, duration_text, duration_minutes";

fn row_to_stay(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStay> {
  Ok(RawStay {
    stay_id:          row.get(0)?,
    id_number:        row.get(1)?,
    person_name:      row.get(2)?,
    vehicle_kind:     row.get(3)?,
    vehicle_brand:    row.get(4)?,
    vehicle_color:    row.get(5)?,
    lock_description: row.get(6)?,
    checked_in_at:    row.get(7)?,
    checked_out_at:   row.get(8)?,
    status:           row.get(9)?,
    duration_text:    row.get(10)?,
    duration_minutes: row.get(11)?,
  })
}

fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id_number:     row.get(0)?,
    display_name:  row.get(1)?,
    registered_at: row.get(2)?,
  })
}

// ─── Constraint classification ───────────────────────────────────────────────

/// True when `err` is a UNIQUE-index violation. On the `stays` table the only
/// unique index besides the primary key is `stays_one_active_per_person`, so
/// a violating insert means an active stay already exists for that ID.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Map a write error onto the person it referenced: a FOREIGN KEY failure
/// means `id_number` was never registered. Anything else passes through.
fn classify_write_err(err: tokio_rusqlite::Error, id_number: &str) -> Error {
  match &err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
    {
      Error::PersonNotFound(id_number.to_owned())
    }
    _ => Error::Database(err),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A corral parking register backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// serialise through one connection, so each operation's statements run
/// without interleaving.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ParkingStore impl ───────────────────────────────────────────────────────

impl ParkingStore for SqliteStore {
  type Error = Error;

  // ── Identity registry ─────────────────────────────────────────────────────

  async fn find_person(&self, id_number: &str) -> Result<Option<Person>> {
    let id = id_number.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id_number, display_name, registered_at
               FROM persons WHERE id_number = ?1",
              rusqlite::params![id],
              row_to_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn register_person(&self, input: NewPerson, now: DateTime<Utc>) -> Result<Person> {
    input.validate()?;

    let id      = input.id_number.clone();
    let name    = input.display_name;
    let at_str  = encode_dt(now);

    // Upsert, then read back: on conflict only the name changes, so the
    // stored `registered_at` is authoritative, not `now`.
    let raw: RawPerson = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (id_number, display_name, registered_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(id_number) DO UPDATE SET display_name = excluded.display_name",
          rusqlite::params![id, name, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT id_number, display_name, registered_at
           FROM persons WHERE id_number = ?1",
          rusqlite::params![id],
          row_to_person,
        )?)
      })
      .await?;

    raw.into_person()
  }

  // ── Vehicle catalog ────────────────────────────────────────────────────────

  async fn list_vehicles(&self, owner_id_number: &str) -> Result<Vec<Vehicle>> {
    let owner = owner_id_number.to_owned();

    let raws: Vec<RawVehicle> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT vehicle_id, owner_id_number, kind, brand_reference, color,
                  lock_description, registered_at
           FROM vehicles WHERE owner_id_number = ?1
           ORDER BY registered_at, vehicle_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner], |row| {
            Ok(RawVehicle {
              vehicle_id:       row.get(0)?,
              owner_id_number:  row.get(1)?,
              kind:             row.get(2)?,
              brand_reference:  row.get(3)?,
              color:            row.get(4)?,
              lock_description: row.get(5)?,
              registered_at:    row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVehicle::into_vehicle).collect()
  }

  async fn register_vehicle(&self, input: NewVehicle, now: DateTime<Utc>) -> Result<Vehicle> {
    input.validate()?;

    let vehicle = Vehicle {
      vehicle_id:       Uuid::new_v4(),
      owner_id_number:  input.owner_id_number,
      kind:             input.kind,
      brand_reference:  input.brand_reference,
      color:            input.color,
      lock_description: input.lock_description,
      registered_at:    now,
    };

    let id_str   = encode_uuid(vehicle.vehicle_id);
    let owner    = vehicle.owner_id_number.clone();
    let kind_str = encode_vehicle_kind(vehicle.kind).to_owned();
    let brand    = vehicle.brand_reference.clone();
    let color    = vehicle.color.clone();
    let lock     = vehicle.lock_description.clone();
    let at_str   = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vehicles (
             vehicle_id, owner_id_number, kind, brand_reference, color,
             lock_description, registered_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, owner, kind_str, brand, color, lock, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| classify_write_err(e, &vehicle.owner_id_number))?;

    Ok(vehicle)
  }

  // ── Stay ledger ────────────────────────────────────────────────────────────

  async fn check_in(&self, input: NewCheckIn, now: DateTime<Utc>) -> Result<CheckInOutcome> {
    let stay = Stay {
      stay_id:          Uuid::new_v4(),
      id_number:        input.id_number,
      person_name:      input.person_name,
      vehicle:          input.vehicle,
      checked_in_at:    now,
      checked_out_at:   None,
      status:           StayStatus::Active,
      duration_text:    None,
      duration_minutes: None,
    };

    let stay_id_str = encode_uuid(stay.stay_id);
    let id_number   = stay.id_number.clone();
    let person_name = stay.person_name.clone();
    let kind_str    = encode_vehicle_kind(stay.vehicle.kind).to_owned();
    let brand       = stay.vehicle.brand_reference.clone();
    let color       = stay.vehicle.color.clone();
    let lock        = stay.vehicle.lock_description.clone();
    let in_str      = encode_dt(now);
    let status_str  = encode_stay_status(StayStatus::Active).to_owned();

    // A plain insert either lands or trips `stays_one_active_per_person` —
    // there is no read-then-write window. On collision the conflicting row is
    // fetched on the same connection before any later write can close it.
    let conflict: Option<RawStay> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO stays (
             stay_id, id_number, person_name, vehicle_kind, vehicle_brand,
             vehicle_color, lock_description, checked_in_at, checked_out_at,
             status, duration_text, duration_minutes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, NULL, NULL)",
          rusqlite::params![
            stay_id_str,
            id_number,
            person_name,
            kind_str,
            brand,
            color,
            lock,
            in_str,
            status_str,
          ],
        );

        match inserted {
          Ok(_) => Ok(None),
          Err(e) if is_unique_violation(&e) => {
            let raw = conn.query_row(
              &format!(
                "SELECT {STAY_COLUMNS} FROM stays
                 WHERE id_number = ?1 AND status = 'active'"
              ),
              rusqlite::params![id_number],
              row_to_stay,
            )?;
            Ok(Some(raw))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(|e| classify_write_err(e, &stay.id_number))?;

    match conflict {
      None      => Ok(CheckInOutcome::CheckedIn(stay)),
      Some(raw) => Ok(CheckInOutcome::AlreadyParked(raw.into_stay()?)),
    }
  }

  async fn check_out(&self, id_number: &str, now: DateTime<Utc>) -> Result<CheckOutOutcome> {
    let open = match self.find_active_stay(id_number).await? {
      Some(stay) => stay,
      None       => return Ok(CheckOutOutcome::NotParked),
    };

    let duration = StayDuration::between(open.checked_in_at, now);
    if duration.clamped {
      tracing::warn!(
        stay_id = %open.stay_id,
        checked_in_at = %open.checked_in_at,
        checked_out_at = %now,
        "check-out instant precedes check-in; recording zero duration"
      );
    }
    let duration_text    = duration.text();
    let duration_minutes = duration.total_minutes();

    let stay_id_str = encode_uuid(open.stay_id);
    let out_str     = encode_dt(now);
    let text        = duration_text.clone();

    // Conditional update keyed on the row still being active; zero rows
    // affected means another session already closed this stay.
    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE stays
           SET checked_out_at = ?1, status = 'closed',
               duration_text = ?2, duration_minutes = ?3
           WHERE stay_id = ?4 AND status = 'active'",
          rusqlite::params![out_str, text, duration_minutes, stay_id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(CheckOutOutcome::NotParked);
    }

    Ok(CheckOutOutcome::CheckedOut(Stay {
      checked_out_at:   Some(now),
      status:           StayStatus::Closed,
      duration_text:    Some(duration_text),
      duration_minutes: Some(duration_minutes),
      ..open
    }))
  }

  async fn find_active_stay(&self, id_number: &str) -> Result<Option<Stay>> {
    let id = id_number.to_owned();

    let raw: Option<RawStay> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STAY_COLUMNS} FROM stays
                 WHERE id_number = ?1 AND status = 'active'"
              ),
              rusqlite::params![id],
              row_to_stay,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStay::into_stay).transpose()
  }

  // ── Views ──────────────────────────────────────────────────────────────────

  async fn list_active(&self) -> Result<Vec<Stay>> {
    let raws: Vec<RawStay> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STAY_COLUMNS} FROM stays WHERE status = 'active'
           ORDER BY CASE vehicle_kind WHEN 'scooter' THEN 0 ELSE 1 END,
                    checked_in_at, stay_id"
        ))?;
        let rows = stmt
          .query_map([], row_to_stay)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStay::into_stay).collect()
  }

  async fn list_recent_closed(&self, limit: usize) -> Result<Vec<Stay>> {
    let limit_val = limit as i64;

    let raws: Vec<RawStay> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STAY_COLUMNS} FROM stays WHERE status = 'closed'
           ORDER BY checked_out_at DESC LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], row_to_stay)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStay::into_stay).collect()
  }
}
