//! Error type for `corral-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] corral_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value outside its expected vocabulary.
  #[error("unexpected column value: {0}")]
  Decode(String),

  /// A write referenced an ID number with no registered person.
  #[error("person not registered: {0}")]
  PersonNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
