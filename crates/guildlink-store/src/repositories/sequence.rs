//! Monotonic id sequence persisted as a decimal string

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, warn};

use guildlink_core::BlobStore;

pub struct SequenceStore {
    current: Mutex<u64>,
    blob: Option<Arc<dyn BlobStore>>,
}

impl SequenceStore {
    pub fn in_memory() -> Self {
        Self {
            current: Mutex::new(0),
            blob: None,
        }
    }

    /// Load the last issued value; unreadable or unparseable contents count as 0
    pub fn open(blob: Arc<dyn BlobStore>) -> Self {
        let current = match blob.read() {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(raw = %raw.trim(), "Sequence storage is not a number; restarting at 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                error!(error = %e, "Failed to read sequence storage; restarting at 0");
                0
            }
        };
        Self {
            current: Mutex::new(current),
            blob: Some(blob),
        }
    }

    /// Last issued value
    pub fn current(&self) -> u64 {
        *self.current.lock()
    }

    /// Increment and persist. A failed write is logged; the id is still used.
    pub fn next_id(&self) -> u64 {
        let mut current = self.current.lock();
        *current += 1;
        if let Some(blob) = &self.blob {
            if let Err(e) = blob.write(&current.to_string()) {
                error!(error = %e, id = *current, "Failed to persist sequence");
            }
        }
        *current
    }
}
