use crate::core::registry::Registry;
use crate::domain::{reservation::Reservation, user::User, zone::Zone};
use crate::utils::error::{ParkError, Result};
use chrono::NaiveDateTime;
use std::fmt;

/// One record of any kind, as returned by [`ParkService::read_all`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    User(&'a User),
    Zone(&'a Zone),
    Reservation(&'a Reservation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked { zone: String },
    ZoneUnavailable { zone: String },
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Booked { zone } => write!(f, "Reservation confirmed for zone: {}", zone),
            BookingOutcome::ZoneUnavailable { zone } => {
                write!(f, "Zone {} is not available for the requested dates", zone)
            }
        }
    }
}

/// Owns the user, zone and reservation collections. Single owner, no locking.
#[derive(Debug, Default, Clone)]
pub struct ParkService {
    users: Registry<User>,
    zones: Registry<Zone>,
    reservations: Registry<Reservation>,
}

impl ParkService {
    pub fn new() -> Self {
        Self::default()
    }

    // Users

    /// Always succeeds. Ids are not checked for uniqueness.
    pub fn create(&mut self, user: User) {
        tracing::debug!("Creating {} user {}", user.kind.label(), user.id());
        self.users.insert(user);
    }

    pub fn read(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Applies `change` to the first user with `id`, keeping lookups in step
    /// if the change gives the user a new id.
    pub fn modify<R>(&mut self, id: &str, change: impl FnOnce(&mut User) -> R) -> Option<R> {
        self.users.modify(id, change)
    }

    /// Replaces the first user with `id`. `None` means no user matched.
    pub fn update(&mut self, user: User, id: &str) -> Option<User> {
        let previous = self.users.replace(id, user);
        if previous.is_none() {
            tracing::debug!("Update skipped, user {} not found", id);
        }
        previous
    }

    pub fn delete(&mut self, id: &str) -> Option<User> {
        tracing::debug!("Deleting user {}", id);
        self.users.remove(id)
    }

    pub fn users(&self) -> &[User] {
        self.users.entries()
    }

    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = Registry::from_entries(users);
    }

    // Zones

    pub fn create_zone(&mut self, zone: Zone) {
        tracing::debug!("Creating zone {}", zone.id());
        self.zones.insert(zone);
    }

    pub fn read_zone(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn modify_zone<R>(&mut self, id: &str, change: impl FnOnce(&mut Zone) -> R) -> Option<R> {
        self.zones.modify(id, change)
    }

    pub fn update_zone(&mut self, zone: Zone, id: &str) -> Option<Zone> {
        self.zones.replace(id, zone)
    }

    pub fn delete_zone(&mut self, id: &str) -> Option<Zone> {
        tracing::debug!("Deleting zone {}", id);
        self.zones.remove(id)
    }

    pub fn zones(&self) -> &[Zone] {
        self.zones.entries()
    }

    pub fn replace_zones(&mut self, zones: Vec<Zone>) {
        self.zones = Registry::from_entries(zones);
    }

    // Reservations

    pub fn create_reservation(&mut self, reservation: Reservation) {
        tracing::debug!("Creating reservation {}", reservation.id());
        self.reservations.insert(reservation);
    }

    pub fn read_reservation(&self, id: &str) -> Option<&Reservation> {
        self.reservations.get(id)
    }

    pub fn update_reservation(&mut self, reservation: Reservation, id: &str) -> Option<Reservation> {
        self.reservations.replace(id, reservation)
    }

    pub fn delete_reservation(&mut self, id: &str) -> Option<Reservation> {
        tracing::debug!("Deleting reservation {}", id);
        self.reservations.remove(id)
    }

    pub fn reservations(&self) -> &[Reservation] {
        self.reservations.entries()
    }

    pub fn replace_reservations(&mut self, reservations: Vec<Reservation>) {
        self.reservations = Registry::from_entries(reservations);
    }

    /// Users, then zones, then reservations, each in insertion order.
    pub fn read_all(&self) -> Vec<Entry<'_>> {
        self.users
            .entries()
            .iter()
            .map(Entry::User)
            .chain(self.zones.entries().iter().map(Entry::Zone))
            .chain(self.reservations.entries().iter().map(Entry::Reservation))
            .collect()
    }

    /// Builds a reservation from stored records and adds it.
    pub fn reserve(
        &mut self,
        id: &str,
        user_id: &str,
        zone_id: &str,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Result<&Reservation> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| ParkError::not_found("User", user_id))?;
        let zone = self
            .zones
            .get(zone_id)
            .ok_or_else(|| ParkError::not_found("Zone", zone_id))?;
        let reservation = Reservation::new(id, user, zone, starts_at, ends_at)?;
        self.create_reservation(reservation);
        self.reservations
            .entries()
            .last()
            .ok_or_else(|| ParkError::not_found("Reservation", id))
    }

    /// Takes the reserved zone off the market if it is still free.
    pub fn book(&mut self, reservation_id: &str) -> Result<BookingOutcome> {
        let outcome = self.with_reserved_zone(reservation_id, |zone| {
            if !zone.is_available() {
                return BookingOutcome::ZoneUnavailable {
                    zone: zone.name.clone(),
                };
            }
            zone.set_availability(false);
            BookingOutcome::Booked {
                zone: zone.name.clone(),
            }
        })?;
        tracing::debug!("Reservation {}: {}", reservation_id, outcome);
        Ok(outcome)
    }

    /// Makes the reserved zone available again.
    pub fn cancel(&mut self, reservation_id: &str) -> Result<()> {
        self.with_reserved_zone(reservation_id, |zone| zone.set_availability(true))?;
        tracing::debug!("Reservation {} cancelled, zone released", reservation_id);
        Ok(())
    }

    pub fn reservation_details(&self, id: &str) -> Option<String> {
        let reservation = self.reservations.get(id)?;
        let user_name = self.users.get(&reservation.user_id).map(User::name);
        let zone_name = self
            .zones
            .get(&reservation.zone_id)
            .map(|z| z.name.as_str());
        Some(reservation.details(user_name, zone_name))
    }

    fn with_reserved_zone<R>(
        &mut self,
        reservation_id: &str,
        change: impl FnOnce(&mut Zone) -> R,
    ) -> Result<R> {
        let zone_id = self
            .reservations
            .get(reservation_id)
            .map(|r| r.zone_id.clone())
            .ok_or_else(|| ParkError::not_found("Reservation", reservation_id))?;
        self.zones
            .modify(&zone_id, change)
            .ok_or_else(|| ParkError::not_found("Zone", &zone_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Frequent, UserKind, UserProfile};
    use chrono::NaiveDate;

    fn frequent(id: &str, name: &str) -> User {
        User::new(
            UserProfile::new(id, name, "f@example.com", "555-0102", false),
            UserKind::Frequent(Frequent {
                total_visits: 0,
                discount_percent: 0.0,
            }),
        )
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_create_read_delete() {
        let mut service = ParkService::new();
        let user = frequent("u-1", "Marta");
        service.create(user.clone());
        assert_eq!(service.read("u-1"), Some(&user));
        assert_eq!(service.delete("u-1"), Some(user));
        assert!(service.read("u-1").is_none());
        assert!(service.delete("u-1").is_none());
    }

    #[test]
    fn test_update_replaces_first_match() {
        let mut service = ParkService::new();
        service.create(frequent("u-1", "Marta"));
        service.create(frequent("u-1", "Duplicate"));
        let previous = service.update(frequent("u-1", "Renamed"), "u-1").unwrap();
        assert_eq!(previous.name(), "Marta");
        assert_eq!(service.users()[0].name(), "Renamed");
        assert_eq!(service.users()[1].name(), "Duplicate");
        assert!(service.update(frequent("u-9", "Ghost"), "u-9").is_none());
    }

    #[test]
    fn test_modify_that_changes_id_keeps_lookups_consistent() {
        let mut service = ParkService::new();
        service.create(frequent("u-1", "Marta"));
        service.create_zone(Zone::new("z-1", "Court", "Court", 15.0));

        service.modify("u-1", |user| {
            user.profile = UserProfile::new("u-2", "Marta", "m@example.com", "555", false)
        });
        assert!(service.read("u-1").is_none());
        assert_eq!(service.read("u-2").unwrap().name(), "Marta");

        service.modify_zone("z-1", |zone| *zone = Zone::new("z-9", "Lawn", "Lawn", 5.0));
        assert!(service.read_zone("z-1").is_none());
        assert_eq!(service.read_zone("z-9").unwrap().name, "Lawn");
        assert!(service.modify_zone("z-1", |_| ()).is_none());
    }

    #[test]
    fn test_read_all_order() {
        let mut service = ParkService::new();
        service.create_zone(Zone::new("z-1", "Court", "Court", 10.0));
        service.create(frequent("u-1", "Marta"));
        service.reserve("r-1", "u-1", "z-1", at(8), at(10)).unwrap();

        let all = service.read_all();
        assert_eq!(all.len(), 3);
        assert!(matches!(all[0], Entry::User(_)));
        assert!(matches!(all[1], Entry::Zone(_)));
        assert!(matches!(all[2], Entry::Reservation(_)));
    }

    #[test]
    fn test_book_then_cancel_flips_zone() {
        let mut service = ParkService::new();
        service.create(frequent("u-1", "Marta"));
        service.create_zone(Zone::new("z-1", "Court", "Court", 15.0));
        let cost = service.reserve("r-1", "u-1", "z-1", at(9), at(12)).unwrap().cost();
        assert_eq!(cost, 45.0);

        assert_eq!(
            service.book("r-1").unwrap(),
            BookingOutcome::Booked {
                zone: "Court".to_string()
            }
        );
        assert!(!service.read_zone("z-1").unwrap().is_available());
        assert!(matches!(
            service.book("r-1").unwrap(),
            BookingOutcome::ZoneUnavailable { .. }
        ));

        service.cancel("r-1").unwrap();
        assert!(service.read_zone("z-1").unwrap().is_available());
    }

    #[test]
    fn test_reserve_unknown_records() {
        let mut service = ParkService::new();
        service.create_zone(Zone::new("z-1", "Court", "Court", 15.0));
        let err = service.reserve("r-1", "nobody", "z-1", at(9), at(10)).unwrap_err();
        assert!(matches!(err, ParkError::NotFoundError { entity: "User", .. }));
        assert!(service.reservations().is_empty());
        assert!(service.book("r-404").is_err());
    }

    #[test]
    fn test_deleting_zone_leaves_reservation() {
        let mut service = ParkService::new();
        service.create(frequent("u-1", "Marta"));
        service.create_zone(Zone::new("z-1", "Court", "Court", 15.0));
        service.reserve("r-1", "u-1", "z-1", at(9), at(10)).unwrap();
        service.delete_zone("z-1");

        assert!(service.read_reservation("r-1").is_some());
        let details = service.reservation_details("r-1").unwrap();
        assert!(details.contains("user=Marta"));
        assert!(details.contains("zone=z-1"));
        assert!(service.cancel("r-1").is_err());
    }
}
