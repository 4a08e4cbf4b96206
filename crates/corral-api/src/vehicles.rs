//! Handlers for the per-person vehicle catalog.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons/{id_number}/vehicles` | Registration order |
//! | `POST` | `/persons/{id_number}/vehicles` | Body: [`NewVehicleBody`]; returns 201 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use corral_core::{
  store::ParkingStore,
  vehicle::{NewVehicle, Vehicle, VehicleKind},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons/{id_number}/vehicles`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(id_number): Path<String>,
) -> Result<Json<Vec<Vehicle>>, ApiError>
where
  S: ParkingStore,
{
  let vehicles = state
    .store
    .list_vehicles(&id_number)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(vehicles))
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /persons/{id_number}/vehicles`.
#[derive(Debug, Deserialize)]
pub struct NewVehicleBody {
  pub kind:             VehicleKind,
  pub brand_reference:  String,
  pub color:            Option<String>,
  pub lock_description: Option<String>,
}

/// `POST /persons/{id_number}/vehicles` — returns 201 + the stored vehicle.
///
/// Always appends; duplicate brand/kind pairs are accepted.
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  Path(id_number): Path<String>,
  Json(body): Json<NewVehicleBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ParkingStore,
{
  // Persons are never deleted, so this existence check cannot go stale
  // before the insert below.
  if state
    .store
    .find_person(&id_number)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "person {id_number} not registered"
    )));
  }

  let input = NewVehicle {
    owner_id_number:  id_number,
    kind:             body.kind,
    brand_reference:  body.brand_reference,
    color:            body.color,
    lock_description: body.lock_description,
  };
  input.validate()?;

  let vehicle = state
    .store
    .register_vehicle(input, Utc::now())
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(vehicle)))
}
