//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use corral_core::stay::Stay;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// A required intake field was missing or blank. Raised before any store
  /// call is attempted.
  #[error("invalid input: {0}")]
  Unprocessable(String),

  /// Check-in rejected: the ID number already has an open stay. Carries that
  /// stay so the response can describe the parked vehicle.
  #[error("check-in conflicts with an open stay")]
  AlreadyParked(Box<Stay>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error; used as `map_err(ApiError::store)` in handlers.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(err))
  }
}

impl From<corral_core::Error> for ApiError {
  fn from(err: corral_core::Error) -> Self {
    match err {
      corral_core::Error::MissingField(_) => {
        ApiError::Unprocessable(err.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Unprocessable(m) => {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": m })))
          .into_response()
      }
      ApiError::AlreadyParked(stay) => {
        let message = format!(
          "{} is already parked: {} {}",
          stay.id_number,
          stay.vehicle.kind.label(),
          stay.vehicle.brand_reference,
        );
        (
          StatusCode::CONFLICT,
          Json(json!({ "error": message, "active_stay": stay })),
        )
          .into_response()
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
