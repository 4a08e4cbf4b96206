//! Handlers for `/persons` endpoints — the identity registry.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons/{id_number}` | 404 if never registered |
//! | `PUT`  | `/persons/{id_number}` | Upsert; body: `{"display_name":"..."}` |

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use corral_core::{
  person::{NewPerson, Person},
  store::ParkingStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id_number}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id_number): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: ParkingStore,
{
  let person = state
    .store
    .find_person(&id_number)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id_number} not registered")))?;
  Ok(Json(person))
}

// ─── Register (upsert) ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub display_name: String,
}

/// `PUT /persons/{id_number}` — body: `{"display_name":"Ana Pérez"}`.
///
/// Registers the person, or corrects the display name of an existing record.
/// `registered_at` is set server-side on first registration and never moves.
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  Path(id_number): Path<String>,
  Json(body): Json<RegisterBody>,
) -> Result<Json<Person>, ApiError>
where
  S: ParkingStore,
{
  let input = NewPerson::new(id_number, body.display_name);
  input.validate()?;

  let person = state
    .store
    .register_person(input, Utc::now())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(person))
}
