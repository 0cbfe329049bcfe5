use crate::domain::{user::User, zone::Zone};
use crate::utils::error::{ParkError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A booking of one zone by one user. The cost is fixed when the
/// reservation is built and does not follow later rate changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReservationRecord")]
pub struct Reservation {
    id: String,
    pub user_id: String,
    pub zone_id: String,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    cost: f64,
}

#[derive(Deserialize)]
struct ReservationRecord {
    id: String,
    user_id: String,
    zone_id: String,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    cost: f64,
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = ParkError;

    fn try_from(record: ReservationRecord) -> Result<Self> {
        check_window(record.starts_at, record.ends_at)?;
        if !(record.cost >= 0.0) {
            return Err(ParkError::invalid_value(
                "cost",
                record.cost,
                "Reservation cost cannot be negative",
            ));
        }
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            zone_id: record.zone_id,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
            cost: record.cost,
        })
    }
}

fn check_window(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<()> {
    if ends_at < starts_at {
        return Err(ParkError::invalid_value(
            "ends_at",
            ends_at,
            format!("Reservation cannot end before it starts ({})", starts_at),
        ));
    }
    Ok(())
}

/// Whole hours between two instants, truncated toward zero.
pub fn whole_hours_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_hours()
}

impl Reservation {
    pub fn new(
        id: impl Into<String>,
        user: &User,
        zone: &Zone,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Result<Self> {
        check_window(starts_at, ends_at)?;
        let cost = zone.rental_cost(whole_hours_between(starts_at, ends_at))?;
        Ok(Self {
            id: id.into(),
            user_id: user.id().to_string(),
            zone_id: zone.id().to_string(),
            starts_at,
            ends_at,
            cost,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn hours(&self) -> i64 {
        whole_hours_between(self.starts_at, self.ends_at)
    }

    /// Renders the reservation with the names of the referenced records.
    pub fn details(&self, user_name: Option<&str>, zone_name: Option<&str>) -> String {
        format!(
            "Reservation [id={}, user={}, zone={}, start={}, end={}, cost={}]",
            self.id,
            user_name.unwrap_or(&self.user_id),
            zone_name.unwrap_or(&self.zone_id),
            self.starts_at,
            self.ends_at,
            self.cost
        )
    }
}
