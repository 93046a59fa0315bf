//! Store adapters for the SHArk data-access layer.

mod config;
mod memory_store;
mod snapshot;

pub use config::{MemoryStoreConfig, DEFAULT_MAX_OPEN_HANDLES};
pub use memory_store::MemoryStore;
pub use snapshot::{Snapshot, SnapshotNode};
