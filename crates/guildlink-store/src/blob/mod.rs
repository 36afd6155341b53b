//! Blob backends implementing the core's `BlobStore` port

mod file;
mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
