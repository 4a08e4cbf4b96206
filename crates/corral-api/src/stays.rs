//! Handlers for the stay ledger and its views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/stays/check-in` | Body: [`CheckInBody`]; 201, or 409 with the open stay |
//! | `POST` | `/stays/check-out` | Body: `{"id_number":"..."}`; 404 when not parked |
//! | `GET`  | `/stays/active/{id_number}` | The open stay for one ID |
//! | `GET`  | `/stays/active` | Everything currently parked, as display rows |
//! | `GET`  | `/stays/history` | Recently closed stays; optional `?limit=`, default 10 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use corral_core::{
  stay::{CheckInOutcome, CheckOutOutcome, NewCheckIn, Stay},
  store::ParkingStore,
  views::{self, ActiveRow, ClosedRow},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Default row count for the recent-history view.
const DEFAULT_HISTORY_LIMIT: usize = 10;

// ─── Check-in ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /stays/check-in`. The vehicle must already be
/// in the person's catalog; its attributes are frozen onto the new stay.
#[derive(Debug, Deserialize)]
pub struct CheckInBody {
  pub id_number:  String,
  pub vehicle_id: Uuid,
}

/// `POST /stays/check-in` — returns 201 + the new stay.
///
/// The check-in instant is captured here, server-side; the body carries no
/// timestamps. Checking in an ID that already has an open stay returns 409
/// carrying that stay.
pub async fn check_in<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CheckInBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ParkingStore,
{
  let person = state
    .store
    .find_person(&body.id_number)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("person {} not registered", body.id_number))
    })?;

  // Resolve the selection within this person's own catalog, so one person
  // cannot check in against another's vehicle.
  let vehicle = state
    .store
    .list_vehicles(&body.id_number)
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .find(|v| v.vehicle_id == body.vehicle_id)
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "vehicle {} not found for person {}",
        body.vehicle_id, body.id_number
      ))
    })?;

  let input = NewCheckIn {
    id_number:   person.id_number,
    person_name: person.display_name,
    vehicle:     vehicle.snapshot(),
  };

  let outcome = state
    .store
    .check_in(input, Utc::now())
    .await
    .map_err(ApiError::store)?;

  match outcome {
    CheckInOutcome::CheckedIn(stay) => Ok((StatusCode::CREATED, Json(stay))),
    CheckInOutcome::AlreadyParked(stay) => {
      Err(ApiError::AlreadyParked(Box::new(stay)))
    }
  }
}

// ─── Check-out ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckOutBody {
  pub id_number: String,
}

/// `POST /stays/check-out` — closes the open stay and returns it with its
/// duration fields populated.
pub async fn check_out<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CheckOutBody>,
) -> Result<Json<Stay>, ApiError>
where
  S: ParkingStore,
{
  let outcome = state
    .store
    .check_out(&body.id_number, Utc::now())
    .await
    .map_err(ApiError::store)?;

  match outcome {
    CheckOutOutcome::CheckedOut(stay) => Ok(Json(stay)),
    CheckOutOutcome::NotParked => Err(ApiError::NotFound(format!(
      "no active stay for {}",
      body.id_number
    ))),
  }
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// `GET /stays/active/{id_number}` — the open stay for one ID, shown to the
/// attendant before confirming a check-out.
pub async fn active_one<S>(
  State(state): State<ApiState<S>>,
  Path(id_number): Path<String>,
) -> Result<Json<Stay>, ApiError>
where
  S: ParkingStore,
{
  let stay = state
    .store
    .find_active_stay(&id_number)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no active stay for {id_number}")))?;
  Ok(Json(stay))
}

/// `GET /stays/active` — everything currently parked, as display rows with a
/// live running duration.
pub async fn active<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<ActiveRow>>, ApiError>
where
  S: ParkingStore,
{
  let stays = state.store.list_active().await.map_err(ApiError::store)?;
  Ok(Json(views::active_rows(&stays, Utc::now(), state.display_tz)))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /stays/history[?limit=N]` — recently closed stays as display rows.
pub async fn history<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ClosedRow>>, ApiError>
where
  S: ParkingStore,
{
  let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
  let stays = state
    .store
    .list_recent_closed(limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(views::closed_rows(&stays, state.display_tz)))
}
