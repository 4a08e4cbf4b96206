//! Error types for `corral-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required intake field was empty or missing.
  #[error("required field missing: {0}")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
