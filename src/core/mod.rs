pub mod registry;
pub mod report;
pub mod service;
pub mod snapshot;

pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
pub use service::{BookingOutcome, Entry, ParkService};
pub use snapshot::{Persistence, SnapshotScope, SnapshotStore};
