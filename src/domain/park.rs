use crate::domain::zone::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Park {
    pub name: String,
    pub location: String,
    pub capacity: u32,
    pub services: Vec<String>,
    pub zones: Vec<Zone>,
    pub available: bool,
}

impl Park {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        capacity: u32,
        services: Vec<String>,
        zones: Vec<Zone>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            capacity,
            services,
            zones,
            available: true,
        }
    }

    pub fn available_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| z.is_available())
    }
}

impl fmt::Display for Park {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zones: Vec<String> = self.zones.iter().map(|z| z.to_string()).collect();
        write!(
            f,
            "Park [name={}, location={}, capacity={}, services=[{}], zones=[{}], available={}]",
            self.name,
            self.location,
            self.capacity,
            self.services.join(", "),
            zones.join(", "),
            self.available
        )
    }
}
