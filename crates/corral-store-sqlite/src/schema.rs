//! SQL schema for the corral SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    id_number     TEXT PRIMARY KEY,  -- national ID, the natural key
    display_name  TEXT NOT NULL,
    registered_at TEXT NOT NULL      -- ISO 8601 UTC; set once, kept on upsert
);

-- The vehicle catalog is append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS vehicles (
    vehicle_id       TEXT PRIMARY KEY,
    owner_id_number  TEXT NOT NULL REFERENCES persons(id_number),
    kind             TEXT NOT NULL,  -- 'scooter' | 'bicycle'
    brand_reference  TEXT NOT NULL,
    color            TEXT,
    lock_description TEXT,
    registered_at    TEXT NOT NULL   -- ISO 8601 UTC; the listing order
);

-- The stay ledger. Rows are inserted active and closed exactly once; no
-- DELETE is ever issued against this table. Person and vehicle columns are
-- denormalised copies taken at check-in.
CREATE TABLE IF NOT EXISTS stays (
    stay_id          TEXT PRIMARY KEY,
    id_number        TEXT NOT NULL REFERENCES persons(id_number),
    person_name      TEXT NOT NULL,
    vehicle_kind     TEXT NOT NULL,  -- 'scooter' | 'bicycle'
    vehicle_brand    TEXT NOT NULL,
    vehicle_color    TEXT,
    lock_description TEXT,
    checked_in_at    TEXT NOT NULL,  -- ISO 8601 UTC; server-assigned
    checked_out_at   TEXT,           -- NULL while the stay is open
    status           TEXT NOT NULL,  -- 'active' | 'closed'
    duration_text    TEXT,           -- rendered once at close
    duration_minutes INTEGER,        -- whole minutes, computed at close
    CHECK ((status = 'active') = (checked_out_at IS NULL))
);

-- At most one active stay per person, enforced by the engine itself.
CREATE UNIQUE INDEX IF NOT EXISTS stays_one_active_per_person
    ON stays(id_number) WHERE status = 'active';

CREATE INDEX IF NOT EXISTS vehicles_owner_idx    ON vehicles(owner_id_number);
CREATE INDEX IF NOT EXISTS stays_status_idx      ON stays(status);
CREATE INDEX IF NOT EXISTS stays_checked_out_idx ON stays(checked_out_at);

PRAGMA user_version = 1;
";
