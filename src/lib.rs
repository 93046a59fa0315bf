//! Data-access and error-reporting layer for SHArk simulation output.
//!
//! The store itself is reached through the [`Store`] port; [`MemoryStore`] is
//! the in-process implementation. Navigation starts from a [`File`] and goes
//! through the [`AbstractGroup`] operations, with every opened object owning
//! its handle until it is dropped.

use std::sync::Arc;

pub use shark_core::{
    dataset, error, file, group, location, marshal, math, options, AbstractGroup,
    ComponentNotFound, DataSet, DataSpace, DataType, ExternalLibraryError, Failure,
    FailureCategory, FailureKind, File, Group, HaloId, HaloNotFound, InvalidData, Location,
    MathError, NativeId, ObjectKind, Options, Result, Store, StoreResult, StoreStatus,
    SubhaloId, SubhaloNotFound,
};
pub use shark_io::{MemoryStore, MemoryStoreConfig, Snapshot, SnapshotNode};

pub mod prelude {
    pub use shark_core::{AbstractGroup, DataSpace, DataType, Failure, FailureKind, File, Group};
}

/// Builds a shared in-memory store from the `store.*` options.
pub fn memory_store_from_options(options: &Options) -> Result<Arc<MemoryStore>> {
    let config = MemoryStoreConfig::from_options(options)?;
    Ok(Arc::new(MemoryStore::with_config(config)?))
}
