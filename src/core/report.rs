use crate::core::service::ParkService;
use crate::domain::ports::Storage;
use crate::utils::error::{ParkError, Result};
use serde::Serialize;

pub const USERS_REPORT: &str = "users.csv";
pub const ZONES_REPORT: &str = "zones.csv";
pub const RESERVATIONS_REPORT: &str = "reservations.csv";

const USER_COLUMNS: [&str; 7] = ["id", "kind", "name", "email", "phone", "is_admin", "details"];
const ZONE_COLUMNS: [&str; 5] = ["id", "name", "kind", "hourly_rate", "available"];
const RESERVATION_COLUMNS: [&str; 7] = [
    "id", "user_id", "zone_id", "starts_at", "ends_at", "hours", "cost",
];

#[derive(Serialize)]
struct UserRow<'a> {
    id: &'a str,
    kind: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    is_admin: bool,
    details: String,
}

#[derive(Serialize)]
struct ZoneRow<'a> {
    id: &'a str,
    name: &'a str,
    kind: &'a str,
    hourly_rate: f64,
    available: bool,
}

#[derive(Serialize)]
struct ReservationRow<'a> {
    id: &'a str,
    user_id: &'a str,
    zone_id: &'a str,
    starts_at: String,
    ends_at: String,
    hours: i64,
    cost: f64,
}

/// Header row first, present even when there are no rows.
fn to_csv<T: Serialize>(columns: &[&str], rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ParkError::IoError(e.into_error()))
}

/// Writes one CSV file per collection and returns the file names written.
pub async fn export_reports<S: Storage>(
    storage: &S,
    service: &ParkService,
) -> Result<Vec<String>> {
    let users = to_csv(&USER_COLUMNS, service.users().iter().map(|u| UserRow {
        id: u.id(),
        kind: u.kind.label(),
        name: &u.profile.name,
        email: &u.profile.email,
        phone: &u.profile.phone,
        is_admin: u.profile.is_admin,
        details: u.details(),
    }))?;
    let zones = to_csv(&ZONE_COLUMNS, service.zones().iter().map(|z| ZoneRow {
        id: z.id(),
        name: &z.name,
        kind: &z.kind,
        hourly_rate: z.hourly_rate,
        available: z.is_available(),
    }))?;
    let reservations = to_csv(&RESERVATION_COLUMNS, service.reservations().iter().map(|r| ReservationRow {
        id: r.id(),
        user_id: &r.user_id,
        zone_id: &r.zone_id,
        starts_at: r.starts_at().to_string(),
        ends_at: r.ends_at().to_string(),
        hours: r.hours(),
        cost: r.cost(),
    }))?;

    let mut written = Vec::new();
    for (name, data) in [
        (USERS_REPORT, users),
        (ZONES_REPORT, zones),
        (RESERVATIONS_REPORT, reservations),
    ] {
        storage.write_file(name, &data).await?;
        tracing::debug!("Wrote report {} ({} bytes)", name, data.len());
        written.push(name.to_string());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalStorage;
    use crate::domain::zone::Zone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_collections_still_get_headers() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
        let mut service = ParkService::new();
        service.create_zone(Zone::new("z-1", "Court", "Court", 20.0));

        export_reports(&storage, &service).await.unwrap();

        let users = std::fs::read_to_string(temp_dir.path().join(USERS_REPORT)).unwrap();
        assert_eq!(users, "id,kind,name,email,phone,is_admin,details\n");
        let reservations =
            std::fs::read_to_string(temp_dir.path().join(RESERVATIONS_REPORT)).unwrap();
        assert_eq!(reservations, "id,user_id,zone_id,starts_at,ends_at,hours,cost\n");

        let zones = std::fs::read_to_string(temp_dir.path().join(ZONES_REPORT)).unwrap();
        let lines: Vec<&str> = zones.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "id,name,kind,hourly_rate,available");
        assert!(lines[1].starts_with("z-1,Court,Court,20"));
        assert!(lines[1].ends_with(",true"));
    }
}
