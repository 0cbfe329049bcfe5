use anyhow::Result;
use chrono::NaiveDate;
use park_rental::core::report::{export_reports, RESERVATIONS_REPORT, USERS_REPORT, ZONES_REPORT};
use park_rental::domain::user::{
    Corporate, Employee, Frequent, International, Residential, User, UserKind, UserProfile,
};
use park_rental::domain::zone::Zone;
use park_rental::{LocalStorage, ParkError, ParkService, Persistence, SnapshotScope, SnapshotStore};
use tempfile::TempDir;

fn sample_service() -> ParkService {
    let mut service = ParkService::new();
    let contact = |id: &str, name: &str| UserProfile::new(id, name, "x@example.com", "555", false);

    service.create(User::new(
        contact("u-1", "Elena"),
        UserKind::Residential(Residential { remaining_events: 3 }),
    ));
    service.create(User::new(
        contact("u-2", "Tomás"),
        UserKind::Frequent(Frequent {
            total_visits: 19,
            discount_percent: 5.0,
        }),
    ));
    service.create(User::new(
        contact("u-3", "Aiko"),
        UserKind::International(
            International::new(
                Corporate {
                    company: "Umbrella".to_string(),
                    events_organized: 6,
                },
                "Japan",
                true,
                4.25,
            )
            .unwrap(),
        ),
    ));
    let mut employee = Employee::new("Guide", 1300.0);
    employee.assign_task("Morning tour");
    service.create(User::new(contact("u-4", "Pablo"), UserKind::Employee(employee)));

    service.create_zone(Zone::new("z-1", "Court A", "Court", 35.0));
    service.create_zone(Zone::new("z-2", "BBQ", "Picnic area", 12.0));

    let day = NaiveDate::from_ymd_opt(2024, 10, 12).unwrap();
    service
        .reserve(
            "r-1",
            "u-1",
            "z-2",
            day.and_hms_opt(11, 0, 0).unwrap(),
            day.and_hms_opt(15, 0, 0).unwrap(),
        )
        .unwrap();
    service.book("r-1").unwrap();
    service
}

#[tokio::test]
async fn test_round_trip_into_fresh_service() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SnapshotStore::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));
    let source = sample_service();

    store
        .save(&source, SnapshotScope::All, "park-data.jsonl")
        .await?;
    assert!(temp_dir.path().join("park-data.jsonl").exists());

    let mut restored = ParkService::new();
    store
        .load(&mut restored, SnapshotScope::All, "park-data.jsonl")
        .await?;

    assert_eq!(restored.users(), source.users());
    assert_eq!(restored.zones(), source.zones());
    assert_eq!(restored.reservations(), source.reservations());
    assert!(!restored.read_zone("z-2").unwrap().is_available());
    Ok(())
}

#[tokio::test]
async fn test_partial_scopes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SnapshotStore::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));
    let source = sample_service();

    store.save(&source, SnapshotScope::Users, "users.jsonl").await?;
    store
        .save(&source, SnapshotScope::ZonesAndReservations, "zones.jsonl")
        .await?;

    let mut restored = ParkService::new();
    store
        .load(&mut restored, SnapshotScope::Users, "users.jsonl")
        .await?;
    assert_eq!(restored.users(), source.users());
    assert!(restored.zones().is_empty());

    store
        .load(&mut restored, SnapshotScope::ZonesAndReservations, "zones.jsonl")
        .await?;
    assert_eq!(restored.zones(), source.zones());
    assert_eq!(restored.reservations(), source.reservations());

    // A users-only file has no zones block.
    let err = store
        .load(&mut restored, SnapshotScope::ZonesAndReservations, "users.jsonl")
        .await
        .unwrap_err();
    assert!(matches!(err, ParkError::SnapshotError { .. }));
    assert_eq!(restored.zones(), source.zones());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_block_leaves_collection_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SnapshotStore::new(LocalStorage::new(temp_dir.path().to_str().unwrap()));
    let source = sample_service();
    store.save(&source, SnapshotScope::All, "data.jsonl").await?;

    let path = temp_dir.path().join("data.jsonl");
    let text = std::fs::read_to_string(&path)?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    lines[2] = "{\"block\":\"zones\",\"entries\":[{\"oops\":true}]}".to_string();
    std::fs::write(&path, lines.join("\n"))?;

    let mut target = ParkService::new();
    target.create_zone(Zone::new("z-old", "Old", "Court", 1.0));
    let err = store
        .load(&mut target, SnapshotScope::All, "data.jsonl")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("zones"));
    assert_eq!(target.users(), source.users());
    assert_eq!(target.zones().len(), 1);
    assert_eq!(target.zones()[0].id(), "z-old");
    assert!(target.reservations().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_export_reports_writes_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
    let service = sample_service();

    let written = export_reports(&storage, &service).await?;
    assert_eq!(written, vec![USERS_REPORT, ZONES_REPORT, RESERVATIONS_REPORT]);

    let mut users = csv::Reader::from_path(temp_dir.path().join(USERS_REPORT))?;
    let headers = users.headers()?.clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[1], "kind");
    let kinds: Vec<String> = users
        .records()
        .map(|r| r.map(|r| r[1].to_string()))
        .collect::<std::result::Result<_, csv::Error>>()?;
    assert_eq!(kinds, vec!["residential", "frequent", "international", "employee"]);

    let reservations = std::fs::read_to_string(temp_dir.path().join(RESERVATIONS_REPORT))?;
    assert!(reservations.starts_with("id,user_id,zone_id,starts_at,ends_at,hours,cost"));
    assert!(reservations.contains("r-1,u-1,z-2,2024-10-12 11:00:00,2024-10-12 15:00:00,4,48"));
    Ok(())
}
