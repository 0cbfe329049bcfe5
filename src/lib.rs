pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{AppConfig, LocalStorage};
pub use core::{ParkService, Persistence, SnapshotScope, SnapshotStore};
pub use utils::error::{ParkError, Result};
