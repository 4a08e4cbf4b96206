//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use corral_core::{
  person::{NewPerson, Person},
  stay::{CheckInOutcome, CheckOutOutcome, NewCheckIn, Stay, StayStatus},
  store::ParkingStore,
  vehicle::{NewVehicle, VehicleKind, VehicleSnapshot},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// 2024-01-01 10:00:00 in Bogota (UTC-5), the reference check-in instant.
fn t0() -> DateTime<Utc> {
  DateTime::parse_from_rfc3339("2024-01-01T10:00:00-05:00")
    .unwrap()
    .with_timezone(&Utc)
}

async fn register(s: &SqliteStore, id: &str, name: &str) -> Person {
  s.register_person(NewPerson::new(id, name), t0())
    .await
    .unwrap()
}

fn new_vehicle(owner: &str, kind: VehicleKind, brand: &str) -> NewVehicle {
  NewVehicle {
    owner_id_number:  owner.into(),
    kind,
    brand_reference:  brand.into(),
    color:            Some("black".into()),
    lock_description: None,
  }
}

fn check_in_input(id: &str, name: &str, kind: VehicleKind, brand: &str) -> NewCheckIn {
  NewCheckIn {
    id_number:   id.into(),
    person_name: name.into(),
    vehicle:     VehicleSnapshot {
      kind,
      brand_reference: brand.into(),
      color: None,
      lock_description: None,
    },
  }
}

/// Check in and unwrap the fresh-stay outcome.
async fn checked_in(
  s: &SqliteStore,
  id: &str,
  name: &str,
  kind: VehicleKind,
  at: DateTime<Utc>,
) -> Stay {
  match s
    .check_in(check_in_input(id, name, kind, "Xiaomi Pro2"), at)
    .await
    .unwrap()
  {
    CheckInOutcome::CheckedIn(stay) => stay,
    CheckInOutcome::AlreadyParked(stay) => {
      panic!("expected a fresh check-in, got conflict with {}", stay.stay_id)
    }
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_find_person() {
  let s = store().await;

  let person = register(&s, "1001", "Ana Pérez").await;
  assert_eq!(person.id_number, "1001");
  assert_eq!(person.display_name, "Ana Pérez");
  assert_eq!(person.registered_at, t0());

  let found = s.find_person("1001").await.unwrap();
  assert_eq!(found, Some(person));
}

#[tokio::test]
async fn find_person_missing_returns_none() {
  let s = store().await;
  assert_eq!(s.find_person("9999").await.unwrap(), None);
}

#[tokio::test]
async fn reregistration_corrects_name_and_keeps_registered_at() {
  let s = store().await;
  register(&s, "1001", "Ana Peres").await;

  let later = t0() + Duration::days(30);
  let corrected = s
    .register_person(NewPerson::new("1001", "Ana Pérez"), later)
    .await
    .unwrap();

  assert_eq!(corrected.display_name, "Ana Pérez");
  // The original registration instant survives the upsert.
  assert_eq!(corrected.registered_at, t0());
}

#[tokio::test]
async fn register_person_requires_a_name() {
  let s = store().await;
  let err = s
    .register_person(NewPerson::new("1001", "   "), t0())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(corral_core::Error::MissingField("display_name"))
  ));
}

// ─── Vehicle catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn vehicles_list_in_registration_order() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  for (i, (kind, brand)) in [
    (VehicleKind::Scooter, "Xiaomi Pro2"),
    (VehicleKind::Bicycle, "Trek FX"),
    (VehicleKind::Scooter, "Segway Max"),
  ]
  .into_iter()
  .enumerate()
  {
    s.register_vehicle(
      new_vehicle("1001", kind, brand),
      t0() + Duration::minutes(i as i64),
    )
    .await
    .unwrap();
  }

  let vehicles = s.list_vehicles("1001").await.unwrap();
  let brands: Vec<&str> = vehicles.iter().map(|v| v.brand_reference.as_str()).collect();
  assert_eq!(brands, ["Xiaomi Pro2", "Trek FX", "Segway Max"]);
}

#[tokio::test]
async fn vehicle_catalog_accepts_duplicates() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  let input = new_vehicle("1001", VehicleKind::Scooter, "Xiaomi Pro2");
  let first = s.register_vehicle(input.clone(), t0()).await.unwrap();
  let second = s
    .register_vehicle(input, t0() + Duration::minutes(1))
    .await
    .unwrap();

  assert_ne!(first.vehicle_id, second.vehicle_id);
  assert_eq!(s.list_vehicles("1001").await.unwrap().len(), 2);
}

#[tokio::test]
async fn register_vehicle_for_unknown_person_errors() {
  let s = store().await;
  let err = s
    .register_vehicle(new_vehicle("9999", VehicleKind::Bicycle, "Trek FX"), t0())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(id) if id == "9999"));
}

// ─── Check-in ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_in_opens_an_active_stay() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  let stay = checked_in(&s, "1001", "Ana Pérez", VehicleKind::Scooter, t0()).await;

  assert_eq!(stay.id_number, "1001");
  assert_eq!(stay.person_name, "Ana Pérez");
  assert_eq!(stay.vehicle.kind, VehicleKind::Scooter);
  assert_eq!(stay.vehicle.brand_reference, "Xiaomi Pro2");
  assert_eq!(stay.checked_in_at, t0());
  assert_eq!(stay.checked_out_at, None);
  assert_eq!(stay.status, StayStatus::Active);
  assert_eq!(stay.duration_text, None);
  assert_eq!(stay.duration_minutes, None);

  let open = s.find_active_stay("1001").await.unwrap();
  assert_eq!(open, Some(stay));
}

#[tokio::test]
async fn second_check_in_reports_already_parked() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  let first = checked_in(&s, "1001", "Ana Pérez", VehicleKind::Scooter, t0()).await;

  let outcome = s
    .check_in(
      check_in_input("1001", "Ana Pérez", VehicleKind::Bicycle, "Trek FX"),
      t0() + Duration::minutes(5),
    )
    .await
    .unwrap();

  // The conflict carries the stay that is already open, so the caller can
  // describe the parked vehicle.
  match outcome {
    CheckInOutcome::AlreadyParked(stay) => {
      assert_eq!(stay.stay_id, first.stay_id);
      assert_eq!(stay.vehicle.brand_reference, "Xiaomi Pro2");
    }
    CheckInOutcome::CheckedIn(_) => panic!("duplicate active stay was allowed"),
  }

  // The ledger still holds exactly one active stay for the ID.
  let active = s.list_active().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].stay_id, first.stay_id);
}

#[tokio::test]
async fn check_in_for_unknown_person_errors() {
  let s = store().await;
  let err = s
    .check_in(
      check_in_input("9999", "Nadie", VehicleKind::Scooter, "Xiaomi Pro2"),
      t0(),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(id) if id == "9999"));
}

#[tokio::test]
async fn check_in_allowed_again_after_check_out() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  checked_in(&s, "1001", "Ana Pérez", VehicleKind::Scooter, t0()).await;
  s.check_out("1001", t0() + Duration::hours(1)).await.unwrap();

  let again = checked_in(
    &s,
    "1001",
    "Ana Pérez",
    VehicleKind::Scooter,
    t0() + Duration::hours(2),
  )
  .await;
  assert_eq!(again.status, StayStatus::Active);
}

// ─── Check-out ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_out_computes_and_persists_duration() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;
  let open = checked_in(&s, "1001", "Ana Pérez", VehicleKind::Scooter, t0()).await;

  // 2024-01-01 11:30:45 in Bogota — 1h 30m 45s after check-in.
  let out_at = DateTime::parse_from_rfc3339("2024-01-01T11:30:45-05:00")
    .unwrap()
    .with_timezone(&Utc);

  let closed = match s.check_out("1001", out_at).await.unwrap() {
    CheckOutOutcome::CheckedOut(stay) => stay,
    CheckOutOutcome::NotParked => panic!("open stay not found"),
  };

  assert_eq!(closed.stay_id, open.stay_id);
  assert_eq!(closed.status, StayStatus::Closed);
  assert_eq!(closed.checked_out_at, Some(out_at));
  assert_eq!(closed.duration_text.as_deref(), Some("01:30:45"));
  assert_eq!(closed.duration_minutes, Some(90));

  // The stay left the active view and is the whole of recent history.
  assert!(s.list_active().await.unwrap().is_empty());
  assert_eq!(s.find_active_stay("1001").await.unwrap(), None);

  let history = s.list_recent_closed(10).await.unwrap();
  assert_eq!(history, vec![closed]);
}

#[tokio::test]
async fn check_out_without_active_stay_reports_not_parked() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  let outcome = s.check_out("9999", t0()).await.unwrap();
  assert_eq!(outcome, CheckOutOutcome::NotParked);

  // Nothing changed.
  assert!(s.list_active().await.unwrap().is_empty());
  assert!(s.list_recent_closed(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn check_out_clock_skew_clamps_duration_to_zero() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;
  checked_in(&s, "1001", "Ana Pérez", VehicleKind::Scooter, t0()).await;

  // A check-out instant before the check-in must not produce a negative
  // duration.
  let skewed = t0() - Duration::minutes(3);
  let closed = match s.check_out("1001", skewed).await.unwrap() {
    CheckOutOutcome::CheckedOut(stay) => stay,
    CheckOutOutcome::NotParked => panic!("open stay not found"),
  };

  assert_eq!(closed.duration_text.as_deref(), Some("00:00:00"));
  assert_eq!(closed.duration_minutes, Some(0));
}

#[tokio::test]
async fn check_out_after_a_day_records_day_prefix() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;
  checked_in(&s, "1001", "Ana Pérez", VehicleKind::Bicycle, t0()).await;

  let out_at = t0() + Duration::days(1) + Duration::hours(2) + Duration::seconds(3);
  let closed = match s.check_out("1001", out_at).await.unwrap() {
    CheckOutOutcome::CheckedOut(stay) => stay,
    CheckOutOutcome::NotParked => panic!("open stay not found"),
  };

  assert_eq!(closed.duration_text.as_deref(), Some("1d 02:00:03"));
  assert_eq!(closed.duration_minutes, Some(26 * 60));
}

// ─── Vehicle selection at check-in ───────────────────────────────────────────

#[tokio::test]
async fn stay_snapshots_the_selected_vehicle() {
  let s = store().await;
  register(&s, "1001", "Ana Pérez").await;

  s.register_vehicle(
    new_vehicle("1001", VehicleKind::Scooter, "Xiaomi Pro2"),
    t0(),
  )
  .await
  .unwrap();
  let bicycle = s
    .register_vehicle(
      new_vehicle("1001", VehicleKind::Bicycle, "Trek FX"),
      t0() + Duration::minutes(1),
    )
    .await
    .unwrap();

  // The caller picks the bicycle out of the catalog.
  let outcome = s
    .check_in(
      NewCheckIn {
        id_number:   "1001".into(),
        person_name: "Ana Pérez".into(),
        vehicle:     bicycle.snapshot(),
      },
      t0() + Duration::minutes(2),
    )
    .await
    .unwrap();

  let stay = match outcome {
    CheckInOutcome::CheckedIn(stay) => stay,
    CheckInOutcome::AlreadyParked(_) => panic!("expected a fresh check-in"),
  };
  assert_eq!(stay.vehicle.kind, VehicleKind::Bicycle);
  assert_eq!(stay.vehicle.brand_reference, "Trek FX");
  assert_eq!(stay.vehicle.color.as_deref(), Some("black"));
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_active_orders_scooters_first_then_by_check_in() {
  let s = store().await;
  for id in ["1001", "1002", "1003"] {
    register(&s, id, "someone").await;
  }

  checked_in(&s, "1001", "someone", VehicleKind::Bicycle, t0()).await;
  let late_scooter =
    checked_in(&s, "1002", "someone", VehicleKind::Scooter, t0() + Duration::minutes(5)).await;
  let early_scooter =
    checked_in(&s, "1003", "someone", VehicleKind::Scooter, t0() + Duration::minutes(1)).await;

  let active = s.list_active().await.unwrap();
  let ids: Vec<&str> = active.iter().map(|st| st.id_number.as_str()).collect();
  assert_eq!(ids, ["1003", "1002", "1001"]);
  assert_eq!(active[0].stay_id, early_scooter.stay_id);
  assert_eq!(active[1].stay_id, late_scooter.stay_id);
}

#[tokio::test]
async fn list_active_is_stable_across_reads() {
  let s = store().await;
  for id in ["1001", "1002", "1003"] {
    register(&s, id, "someone").await;
    checked_in(&s, id, "someone", VehicleKind::Scooter, t0()).await;
  }

  let first = s.list_active().await.unwrap();
  let second = s.list_active().await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn recent_closed_is_newest_first_and_limited() {
  let s = store().await;
  for (i, id) in ["1001", "1002", "1003"].into_iter().enumerate() {
    register(&s, id, "someone").await;
    checked_in(&s, id, "someone", VehicleKind::Scooter, t0()).await;
    s.check_out(id, t0() + Duration::hours(1 + i as i64))
      .await
      .unwrap();
  }

  let history = s.list_recent_closed(2).await.unwrap();
  let ids: Vec<&str> = history.iter().map(|st| st.id_number.as_str()).collect();
  // 1003 checked out last, 1001 first; the limit cuts 1001 off.
  assert_eq!(ids, ["1003", "1002"]);
}
