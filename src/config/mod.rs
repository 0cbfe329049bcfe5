pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::SnapshotScope;
use chrono::NaiveDateTime;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};

pub use storage::LocalStorage;
pub use toml_config::AppConfig;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses `2024-05-01T10:00`, with or without seconds, `T` or space separated.
pub fn parse_timestamp(value: &str) -> std::result::Result<NaiveDateTime, String> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| format!("'{}' is not a timestamp like 2024-05-01T10:00", value))
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "park-rental")]
#[command(about = "Manage park users, zones and reservations")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the data directory from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage zones
    #[command(subcommand)]
    Zone(ZoneCommand),
    /// Manage reservations
    #[command(subcommand)]
    Reservation(ReservationCommand),
    /// Save or load snapshot files
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
    /// Write CSV reports of every collection
    Export,
    /// Apply a discount and a tax rate to an amount
    Invoice {
        #[arg(long)]
        amount: f64,
        /// Discount percent, ignored outside (0, 100]
        #[arg(long, default_value = "0")]
        discount: f64,
        /// Tax rate percent
        #[arg(long, default_value = "0")]
        tax: f64,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub admin: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CreateUser {
    Residential {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Events the user may still rent a park for
        #[arg(long, default_value = "0")]
        events: u32,
    },
    Corporate {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "0")]
        events_organized: u32,
    },
    Frequent {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long, default_value = "0")]
        visits: u32,
        #[arg(long, default_value = "0")]
        discount: f64,
    },
    International {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "0")]
        events_organized: u32,
        #[arg(long)]
        country: String,
        #[arg(long)]
        translator: bool,
        #[arg(long)]
        rate: f64,
    },
    Employee {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        role: String,
        #[arg(long)]
        salary: f64,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum UserCommand {
    #[command(subcommand)]
    Create(CreateUser),
    Show {
        id: String,
    },
    Rename {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
    List,
    /// Register a visit of a frequent user
    Visit {
        id: String,
    },
    /// Register an event organized by a corporate or international user
    RegisterEvent {
        id: String,
    },
    AssignTask {
        id: String,
        task: String,
    },
    /// Price an event for a corporate or international user
    EventCost {
        id: String,
        #[arg(long)]
        attendees: u32,
        #[arg(long, default_value = "0")]
        base_rate: f64,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ZoneArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long = "type")]
    pub kind: String,
    #[arg(long)]
    pub rate: f64,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum ZoneCommand {
    Create(ZoneArgs),
    Show { id: String },
    /// Replace the zone with the given id
    Update(ZoneArgs),
    Delete { id: String },
    List,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum ReservationCommand {
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        zone: String,
        #[arg(long, value_parser = parse_timestamp)]
        start: NaiveDateTime,
        #[arg(long, value_parser = parse_timestamp)]
        end: NaiveDateTime,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    List,
    /// Take the reserved zone if it is still available
    Book {
        id: String,
    },
    /// Release the reserved zone
    Cancel {
        id: String,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Users,
    ZonesAndReservations,
    All,
}

#[cfg(feature = "cli")]
impl From<ScopeArg> for SnapshotScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Users => SnapshotScope::Users,
            ScopeArg::ZonesAndReservations => SnapshotScope::ZonesAndReservations,
            ScopeArg::All => SnapshotScope::All,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum SnapshotCommand {
    /// Write the selected collections to a snapshot file
    Save {
        #[arg(long, value_enum, default_value = "all")]
        scope: ScopeArg,
        /// File name under the data directory
        #[arg(long)]
        file: Option<String>,
    },
    /// Replace the selected collections from a snapshot file
    Load {
        #[arg(long, value_enum, default_value = "all")]
        scope: ScopeArg,
        #[arg(long)]
        file: Option<String>,
    },
}
