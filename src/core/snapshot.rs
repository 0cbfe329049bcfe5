//! Snapshot persistence.
//!
//! A snapshot is a JSON-lines file. The first line is a header block carrying
//! the format version, the save time and the scope; every following line is
//! one collection block, always in the order users, zones, reservations:
//!
//! ```text
//! {"block":"header","version":1,"saved_at":"2024-05-01T10:00:00Z","scope":"all"}
//! {"block":"users","entries":[...]}
//! {"block":"zones","entries":[...]}
//! {"block":"reservations","entries":[...]}
//! ```
//!
//! Loading replaces each collection as soon as its block is decoded. The
//! first failing block aborts the load; blocks applied before it stay applied.

use crate::core::service::ParkService;
use crate::domain::ports::Storage;
use crate::domain::{reservation::Reservation, user::User, zone::Zone};
use crate::utils::error::{ParkError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotScope {
    Users,
    ZonesAndReservations,
    All,
}

impl SnapshotScope {
    pub fn blocks(self) -> &'static [BlockKind] {
        match self {
            SnapshotScope::Users => &[BlockKind::Users],
            SnapshotScope::ZonesAndReservations => &[BlockKind::Zones, BlockKind::Reservations],
            SnapshotScope::All => &[BlockKind::Users, BlockKind::Zones, BlockKind::Reservations],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Users,
    Zones,
    Reservations,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockKind::Users => "users",
            BlockKind::Zones => "zones",
            BlockKind::Reservations => "reservations",
        })
    }
}

#[derive(Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
enum BlockRef<'a> {
    Header {
        version: u32,
        saved_at: DateTime<Utc>,
        scope: SnapshotScope,
    },
    Users {
        entries: &'a [User],
    },
    Zones {
        entries: &'a [Zone],
    },
    Reservations {
        entries: &'a [Reservation],
    },
}

#[derive(Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
enum Block {
    Header {
        version: u32,
        #[allow(dead_code)]
        saved_at: DateTime<Utc>,
        #[allow(dead_code)]
        scope: SnapshotScope,
    },
    Users {
        entries: Vec<User>,
    },
    Zones {
        entries: Vec<Zone>,
    },
    Reservations {
        entries: Vec<Reservation>,
    },
}

impl Block {
    fn name(&self) -> &'static str {
        match self {
            Block::Header { .. } => "header",
            Block::Users { .. } => "users",
            Block::Zones { .. } => "zones",
            Block::Reservations { .. } => "reservations",
        }
    }
}

fn write_line<T: Serialize>(buffer: &mut Vec<u8>, block: &T) -> Result<()> {
    serde_json::to_writer(&mut *buffer, block)?;
    buffer.push(b'\n');
    Ok(())
}

pub fn encode(service: &ParkService, scope: SnapshotScope) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_line(
        &mut buffer,
        &BlockRef::Header {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            scope,
        },
    )?;
    for kind in scope.blocks() {
        let block = match kind {
            BlockKind::Users => BlockRef::Users {
                entries: service.users(),
            },
            BlockKind::Zones => BlockRef::Zones {
                entries: service.zones(),
            },
            BlockKind::Reservations => BlockRef::Reservations {
                entries: service.reservations(),
            },
        };
        write_line(&mut buffer, &block)?;
    }
    Ok(buffer)
}

/// Applies the blocks of `scope` found in `data` to `service`.
pub fn apply(data: &[u8], service: &mut ParkService, scope: SnapshotScope) -> Result<()> {
    let text = std::str::from_utf8(data)
        .map_err(|e| ParkError::snapshot("header", format!("not valid UTF-8: {}", e)))?;
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ParkError::snapshot("header", "snapshot is empty"))?;
    match serde_json::from_str::<Block>(header)
        .map_err(|e| ParkError::snapshot("header", e.to_string()))?
    {
        Block::Header { version, .. } if version == SNAPSHOT_VERSION => {}
        Block::Header { version, .. } => {
            return Err(ParkError::snapshot(
                "header",
                format!("unsupported snapshot version {}", version),
            ))
        }
        other => {
            return Err(ParkError::snapshot(
                "header",
                format!("found {} block", other.name()),
            ))
        }
    }

    for &kind in scope.blocks() {
        let line = lines
            .next()
            .ok_or_else(|| ParkError::snapshot(kind.to_string(), "block is missing"))?;
        let block: Block = serde_json::from_str(line)
            .map_err(|e| ParkError::snapshot(kind.to_string(), e.to_string()))?;
        match (kind, block) {
            (BlockKind::Users, Block::Users { entries }) => service.replace_users(entries),
            (BlockKind::Zones, Block::Zones { entries }) => service.replace_zones(entries),
            (BlockKind::Reservations, Block::Reservations { entries }) => {
                service.replace_reservations(entries)
            }
            (expected, found) => {
                return Err(ParkError::snapshot(
                    expected.to_string(),
                    format!("found {} block", found.name()),
                ))
            }
        }
        tracing::debug!("Applied {} block", kind);
    }
    Ok(())
}

#[async_trait]
pub trait Persistence: Send + Sync {
    async fn save(&self, service: &ParkService, scope: SnapshotScope, name: &str) -> Result<()>;

    /// Replaces each collection of `scope` as its block is read.
    async fn load(&self, service: &mut ParkService, scope: SnapshotScope, name: &str)
        -> Result<()>;
}

pub struct SnapshotStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage> Persistence for SnapshotStore<S> {
    async fn save(&self, service: &ParkService, scope: SnapshotScope, name: &str) -> Result<()> {
        let data = encode(service, scope)?;
        self.storage.write_file(name, &data).await?;
        tracing::info!(
            "Saved {:?} snapshot to {} ({} users, {} zones, {} reservations)",
            scope,
            name,
            service.users().len(),
            service.zones().len(),
            service.reservations().len()
        );
        Ok(())
    }

    async fn load(
        &self,
        service: &mut ParkService,
        scope: SnapshotScope,
        name: &str,
    ) -> Result<()> {
        let data = self.storage.read_file(name).await?;
        if let Err(e) = apply(&data, service, scope) {
            tracing::warn!("Snapshot load from {} aborted: {}", name, e);
            return Err(e);
        }
        tracing::info!("Loaded {:?} snapshot from {}", scope, name);
        Ok(())
    }
}
