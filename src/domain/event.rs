use crate::domain::park::Park;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub park: Park,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub max_capacity: u32,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        park: Park,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        max_capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            park,
            starts_at,
            ends_at,
            max_capacity,
        }
    }

    pub fn duration(&self) -> Duration {
        self.ends_at - self.starts_at
    }

    pub fn admits(&self, attendees: u32) -> bool {
        attendees <= self.max_capacity
    }
}
