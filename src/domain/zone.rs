use crate::utils::error::{ParkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rentable sub-area of a park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    id: String,
    pub name: String,
    pub kind: String,
    pub hourly_rate: f64,
    available: bool,
}

impl Zone {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        hourly_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            hourly_rate,
            available: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_availability(&mut self, available: bool) {
        self.available = available;
    }

    pub fn rental_cost(&self, hours: i64) -> Result<f64> {
        if hours < 0 {
            return Err(ParkError::invalid_value(
                "hours",
                hours,
                "Rental hours cannot be negative",
            ));
        }
        Ok(self.hourly_rate * hours as f64)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zone [id={}, name={}, type={}, hourly_rate={}, available={}]",
            self.id, self.name, self.kind, self.hourly_rate, self.available
        )
    }
}
