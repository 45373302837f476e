use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use products_hr::{
    CompensationStore, CompensationSubmission, DbStore, DirectReport, Employee, EmployeeStore,
    HrError, HrService, hierarchy::count_reports, seed::seed_store,
};
use sea_orm::Database;

const JOHN: &str = "16a596ae-edd3-4847-99fe-c4518e82c86f";

async fn setup() -> DbStore {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    DbStore::new(conn)
}

fn employee(id: &str, reports: &[&str]) -> Employee {
    Employee {
        employee_id: id.to_string(),
        first_name: "First".into(),
        last_name: "Last".into(),
        position: "Developer".into(),
        department: "Engineering".into(),
        direct_reports: reports.iter().copied().map(DirectReport::new).collect(),
    }
}

#[tokio::test]
async fn employee_round_trips_with_reports() {
    let store = setup().await;
    let created = EmployeeStore::create(&store, employee("a", &["b", "c"]))
        .await
        .unwrap();
    let read = EmployeeStore::read_by_id(&store, "a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, created);
    assert!(
        EmployeeStore::read_by_id(&store, "missing")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn employee_update_replaces_fields() {
    let store = setup().await;
    EmployeeStore::create(&store, employee("a", &["b"]))
        .await
        .unwrap();
    let mut changed = employee("a", &[]);
    changed.position = "Manager".into();
    EmployeeStore::update(&store, changed).await.unwrap();

    let read = EmployeeStore::read_by_id(&store, "a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.position, "Manager");
    assert!(read.direct_reports.is_empty());
}

#[tokio::test]
async fn counter_walks_database_hierarchy() {
    let store = setup().await;
    for e in [
        employee("a", &["b", "c"]),
        employee("b", &["d"]),
        employee("c", &["d", "a"]),
        employee("d", &["ghost"]),
    ] {
        EmployeeStore::create(&store, e).await.unwrap();
    }
    let root = EmployeeStore::read_by_id(&store, "a")
        .await
        .unwrap()
        .unwrap();
    // b, c, d, the dangling ghost, and a itself through c
    assert_eq!(count_reports(&store, &root).await.unwrap(), 5);
}

#[tokio::test]
async fn compensation_upserts_by_employee_id() {
    let store = setup().await;
    EmployeeStore::create(&store, employee("a", &[]))
        .await
        .unwrap();
    let date = Utc.with_ymd_and_hms(2031, 3, 1, 9, 30, 0).unwrap();
    for salary in [90_000.0, 95_500.25] {
        CompensationStore::create(
            &store,
            products_hr::Compensation {
                employee_id: "a".into(),
                salary,
                effective_date: date,
            },
        )
        .await
        .unwrap();
    }
    let read = CompensationStore::read_by_id(&store, "a")
        .await
        .unwrap()
        .unwrap();
    assert!((read.salary - 95_500.25).abs() < 0.001);
    assert_eq!(read.effective_date, date);
}

#[tokio::test]
async fn service_over_database_store() {
    let store = Arc::new(setup().await);
    seed_store(store.as_ref()).await.unwrap();
    let service = HrService::from_store(store);

    let structure = service.reporting_structure(JOHN).await.unwrap().unwrap();
    assert_eq!(structure.number_of_reports, 4);

    let whole_second = Utc.with_ymd_and_hms(2031, 3, 1, 9, 30, 0).unwrap();
    let submission = CompensationSubmission {
        employee_id: Some(JOHN.to_string()),
        salary: Some(10_000.0),
        effective_date: Some(whole_second + Duration::nanoseconds(123_456_789)),
    };
    let created = service.create_compensation(&submission).await.unwrap();
    let read = service.compensation(JOHN).await.unwrap().unwrap();
    assert_eq!(read, created);
    assert_eq!(read.effective_date, whole_second + Duration::microseconds(123_456));
    assert!((read.salary - 10_000.0).abs() < 0.001);

    let unknown = CompensationSubmission {
        employee_id: Some("not-an-employee".into()),
        ..submission
    };
    let err = service.create_compensation(&unknown).await.unwrap_err();
    assert!(matches!(err, HrError::UnknownEmployee(_)));
    assert!(service.compensation("not-an-employee").await.unwrap().is_none());
}
