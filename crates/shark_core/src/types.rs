use serde::{Deserialize, Serialize};

pub type HaloId = i64;
pub type SubhaloId = i64;

/// Opaque identifier of a live object inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NativeId(i64);

impl NativeId {
    pub const INVALID: NativeId = NativeId(-1);

    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl std::fmt::Display for NativeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a [`NativeId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    File,
    Group,
    Dataset,
    Other,
}

impl ObjectKind {
    /// Files and groups can both hold children.
    #[must_use]
    pub const fn is_group_like(&self) -> bool {
        matches!(self, Self::File | Self::Group)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Group => "group",
            Self::Dataset => "dataset",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Element type of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// Fixed-length string of `len` bytes.
    String { len: usize },
}

/// Shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSpace {
    Scalar,
    Simple(Vec<u64>),
}

impl DataSpace {
    #[must_use]
    pub fn simple(dims: impl Into<Vec<u64>>) -> Self {
        Self::Simple(dims.into())
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        match self {
            Self::Scalar => 0,
            Self::Simple(dims) => dims.len(),
        }
    }

    #[must_use]
    pub fn dims(&self) -> &[u64] {
        match self {
            Self::Scalar => &[],
            Self::Simple(dims) => dims,
        }
    }

    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.dims().iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_id_validity() {
        assert!(!NativeId::INVALID.is_valid());
        assert!(NativeId::new(0).is_valid());
        assert_eq!(NativeId::new(7).to_string(), "#7");
    }

    #[test]
    fn test_group_like() {
        assert!(ObjectKind::File.is_group_like());
        assert!(ObjectKind::Group.is_group_like());
        assert!(!ObjectKind::Dataset.is_group_like());
    }

    #[test]
    fn test_data_space() {
        assert_eq!(DataSpace::Scalar.rank(), 0);
        assert_eq!(DataSpace::Scalar.num_elements(), 1);

        let space = DataSpace::simple([3, 4]);
        assert_eq!(space.rank(), 2);
        assert_eq!(space.dims(), &[3, 4]);
        assert_eq!(space.num_elements(), 12);
    }
}
