use peerlink_core::RoomId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Identity remembered between launches: who we are and which room we
/// last used. Consulted at startup to skip the login flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredIdentity {
    pub username: String,
    pub room_id: RoomId,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub trait IdentityStore: Send + Sync {
    /// Absent when nothing was saved or the stored data is unreadable.
    fn get(&self) -> Option<StoredIdentity>;
    fn save(&self, identity: &StoredIdentity) -> Result<(), IdentityError>;
    fn clear(&self) -> Result<(), IdentityError>;
}

/// File-backed store, one JSON document at a fixed path.
pub struct JsonIdentityStore {
    path: PathBuf,
}

impl JsonIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentityStore for JsonIdentityStore {
    fn get(&self) -> Option<StoredIdentity> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Stored identity is corrupt; treating as absent: {e}");
                None
            }
        }
    }

    fn save(&self, identity: &StoredIdentity) -> Result<(), IdentityError> {
        let json = serde_json::to_string_pretty(identity)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), IdentityError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
