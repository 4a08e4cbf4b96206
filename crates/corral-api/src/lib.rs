//! JSON REST API for the corral parking register.
//!
//! Exposes an axum [`Router`] backed by any
//! [`corral_core::store::ParkingStore`]. Transport, TLS, and request tracing
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = ApiState::new(Arc::new(store), chrono_tz::America::Bogota);
//! let app = corral_api::api_router(state);
//! ```

pub mod error;
pub mod persons;
pub mod stays;
pub mod vehicles;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chrono_tz::Tz;
use corral_core::store::ParkingStore;

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
///
/// `display_tz` is the facility's civil timezone; it is consulted only when
/// projecting stays into display rows. Stored instants stay UTC throughout.
pub struct ApiState<S> {
  pub store:      Arc<S>,
  pub display_tz: Tz,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, display_tz: Tz) -> Self {
    Self { store, display_tz }
  }
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      display_tz: self.display_tz,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ParkingStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Identity registry
    .route(
      "/persons/{id_number}",
      get(persons::get_one::<S>).put(persons::register::<S>),
    )
    // Vehicle catalog
    .route(
      "/persons/{id_number}/vehicles",
      get(vehicles::list::<S>).post(vehicles::register::<S>),
    )
    // Stay ledger
    .route("/stays/check-in", post(stays::check_in::<S>))
    .route("/stays/check-out", post(stays::check_out::<S>))
    .route("/stays/active/{id_number}", get(stays::active_one::<S>))
    // Views
    .route("/stays/active", get(stays::active::<S>))
    .route("/stays/history", get(stays::history::<S>))
    .with_state(state)
}
