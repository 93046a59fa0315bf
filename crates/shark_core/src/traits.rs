//! The port through which the access layer talks to a hierarchical store.
//!
//! The trait keeps the conventions of the C API it stands in for: objects are
//! named by bare [`NativeId`]s that the caller must close, and variable-length
//! names are fetched with the "ask size, then fill buffer" probe. Adapters live
//! in `shark_io`; everything in this crate is written against the trait.

use std::fmt;

use crate::error::{ComponentNotFound, Failure, InvalidData};
use crate::types::{DataSpace, DataType, NativeId, ObjectKind};

/// Raw status reported by the store when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreStatus {
    NotFound,
    AlreadyExists,
    WrongKind,
    InvalidHandle,
    InvalidName,
    ReadOnly,
    TooManyHandles,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "object not found",
            Self::AlreadyExists => "object already exists",
            Self::WrongKind => "object has the wrong kind",
            Self::InvalidHandle => "invalid handle",
            Self::InvalidName => "invalid name",
            Self::ReadOnly => "store is read-only",
            Self::TooManyHandles => "too many open handles",
        };
        f.write_str(text)
    }
}

impl StoreStatus {
    /// Maps the raw status onto the nearest member of the failure taxonomy.
    ///
    /// `context` describes what was being attempted, e.g. "opening group
    /// 'h1' in '/halos'".
    pub fn into_failure(self, context: impl fmt::Display) -> Failure {
        match self {
            Self::NotFound => {
                ComponentNotFound::Component(format!("Not found while {context}")).into()
            }
            Self::WrongKind => {
                InvalidData::Malformed(format!("Unexpected object kind while {context}")).into()
            }
            Self::AlreadyExists => {
                Failure::InvalidArgument(format!("Object already exists while {context}"))
            }
            Self::InvalidHandle | Self::InvalidName | Self::ReadOnly => {
                Failure::InvalidArgument(format!("{self} while {context}"))
            }
            Self::TooManyHandles => {
                Failure::Io(std::io::Error::other(format!("{self} while {context}")))
            }
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreStatus>;

/// A self-describing hierarchical store of groups and datasets.
///
/// Implementations are not required to be safe for concurrent use of the same
/// identifier; the `Send + Sync` bound only lets a store be shared behind an
/// `Arc` once the implementation serialises its own state.
///
/// # Example
///
/// ```ignore
/// let id = store.group_open(root, "halos")?;
/// let n = store.num_objs(id)?;
/// store.close(id)?;
/// ```
pub trait Store: Send + Sync {
    fn file_create(&self, name: &str) -> StoreResult<NativeId>;

    fn file_open(&self, name: &str) -> StoreResult<NativeId>;

    fn group_open(&self, parent: NativeId, name: &str) -> StoreResult<NativeId>;

    fn group_create(&self, parent: NativeId, name: &str) -> StoreResult<NativeId>;

    fn dataset_open(&self, parent: NativeId, name: &str) -> StoreResult<NativeId>;

    fn dataset_create(
        &self,
        parent: NativeId,
        name: &str,
        data_type: &DataType,
        data_space: &DataSpace,
    ) -> StoreResult<NativeId>;

    /// Releases one identifier. Closing an identifier twice is an error.
    fn close(&self, id: NativeId) -> StoreResult<()>;

    /// Kind of the object behind `id`, or `None` if `id` is not open.
    fn kind_of(&self, id: NativeId) -> Option<ObjectKind>;

    /// Number of children of the group-like object `group`.
    fn num_objs(&self, group: NativeId) -> StoreResult<u64>;

    /// Name of the `idx`-th child of `group`.
    ///
    /// With `buf == None` returns the length of the name in bytes, excluding
    /// the terminator. With a buffer, writes at most `buf.len() - 1` bytes of
    /// the name followed by a NUL and returns the full name length. Returns a
    /// negative value on failure.
    fn objname_by_idx(&self, group: NativeId, idx: u64, buf: Option<&mut [u8]>) -> isize;

    fn objtype_by_idx(&self, group: NativeId, idx: u64) -> StoreResult<ObjectKind>;

    fn dataset_type(&self, dataset: NativeId) -> StoreResult<DataType>;

    fn dataset_space(&self, dataset: NativeId) -> StoreResult<DataSpace>;
}
