//! Durable storage for the swap history.
//!
//! The whole history of every wallet seen on this installation lives in a
//! single named slot as a JSON array. [`SlotStorage`] is the raw slot backend,
//! [`SwapStore`] the best-effort view the rest of the crate talks to.

use crate::entity::{SwapRecord, TrackerError};
use async_trait::async_trait;
use log::{debug, error, warn};
use std::sync::Arc;

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::FileSlotStorage;
pub use memory::MemorySlotStorage;
pub use postgres::PgSlotStorage;

/// Maximum number of swaps kept in the persisted history, across all wallets
pub const MAX_STORED_SWAPS: usize = 100;

/// Default name of the slot holding the swap history
pub const DEFAULT_SLOT_KEY: &str = "swap_history";

/// A named key-value slot holding a serialized value
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// Returns `None` when nothing has been written under `key` yet
    async fn read(&self, key: &str) -> Result<Option<String>, TrackerError>;

    async fn write(&self, key: &str, value: String) -> Result<(), TrackerError>;
}

/// Persisted swap history. Failures never reach the caller.
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Full persisted collection, newest first. Empty if unreadable.
    async fn load(&self) -> Vec<SwapRecord>;

    /// Overwrites the persisted collection with at most [`MAX_STORED_SWAPS`] entries
    async fn save(&self, records: &[SwapRecord]);
}

/// [`SwapStore`] that keeps the history as JSON in one slot of a [`SlotStorage`]
pub struct SlotSwapStore {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl SlotSwapStore {
    pub fn new(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SwapStore for SlotSwapStore {
    async fn load(&self) -> Vec<SwapRecord> {
        let raw = match self.storage.read(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to read swap history slot '{}': {}", self.key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<SwapRecord>>(&raw) {
            Ok(records) => {
                debug!("Loaded {} swaps from slot '{}'", records.len(), self.key);
                records
            }
            Err(e) => {
                warn!(
                    "Swap history slot '{}' is corrupted, treating it as empty: {}",
                    self.key, e
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, records: &[SwapRecord]) {
        let bounded = &records[..records.len().min(MAX_STORED_SWAPS)];

        let serialized = match serde_json::to_string(bounded) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize swap history: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.key, serialized).await {
            error!("Failed to write swap history slot '{}': {}", self.key, e);
        }
    }
}
