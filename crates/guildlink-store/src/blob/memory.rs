//! In-memory blob, for tests and `storage.in_memory`

use parking_lot::RwLock;

use guildlink_core::{BlobError, BlobStore};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    contents: RwLock<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing contents, e.g. a snapshot captured from another store
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(contents.into())),
        }
    }

    /// Current contents without going through the trait
    pub fn snapshot(&self) -> Option<String> {
        self.contents.read().clone()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self) -> Result<Option<String>, BlobError> {
        Ok(self.contents.read().clone())
    }

    fn write(&self, contents: &str) -> Result<(), BlobError> {
        *self.contents.write() = Some(contents.to_string());
        Ok(())
    }
}
