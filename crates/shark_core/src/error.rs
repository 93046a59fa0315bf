//! The failure taxonomy shared by every layer of the simulation.
//!
//! Each level of the hierarchy is its own `thiserror` type and converts into
//! its ancestors through `From`, so a `HaloNotFound` can be returned with `?`
//! from a function whose error type is `ComponentNotFound`, `InvalidData` or
//! the root [`Failure`]. Callers that only care about the broad category match
//! on [`Failure::kind`] and [`FailureKind::is_a`]; callers that need the
//! structured payload use the `as_*` accessors.

use std::fmt;

use thiserror::Error;

use crate::types::{HaloId, SubhaloId};

/// The root of the taxonomy.
#[derive(Debug, Error)]
pub enum Failure {
    /// An invalid option value was given by the user.
    #[error("{0}")]
    InvalidOption(String),

    /// An invalid argument was given to a function or type.
    #[error("{0}")]
    InvalidArgument(String),

    /// A required option value is missing.
    #[error("{0}")]
    MissingOption(String),

    #[error(transparent)]
    InvalidData(#[from] InvalidData),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid data was encountered, either in persisted output or while
/// talking to the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidData {
    #[error("{0}")]
    Malformed(String),

    #[error("Index {index} is out of range for {location} ({len} objects)")]
    IndexOutOfRange {
        index: u64,
        len: u64,
        location: String,
    },

    /// A value could not be retrieved from the store.
    #[error("{0}")]
    Retrieval(String),

    #[error(transparent)]
    ComponentNotFound(#[from] ComponentNotFound),
}

/// A structural component was expected but not found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentNotFound {
    #[error("{0}")]
    Component(String),

    #[error(transparent)]
    Halo(#[from] HaloNotFound),

    #[error(transparent)]
    Subhalo(#[from] SubhaloNotFound),
}

/// A halo was expected but not found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HaloNotFound {
    message: String,
    /// The ID of the halo that could not be found.
    pub halo_id: HaloId,
}

impl HaloNotFound {
    pub fn new(message: impl Into<String>, halo_id: HaloId) -> Self {
        Self {
            message: message.into(),
            halo_id,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A subhalo was expected but not found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubhaloNotFound {
    message: String,
    /// The ID of the subhalo that could not be found.
    pub subhalo_id: SubhaloId,
}

impl SubhaloNotFound {
    pub fn new(message: impl Into<String>, subhalo_id: SubhaloId) -> Self {
        Self {
            message: message.into(),
            subhalo_id,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("{0}")]
    Numerical(String),

    #[error(transparent)]
    ExternalLibrary(#[from] ExternalLibraryError),
}

/// A failure reported by the external numerical library.
///
/// The displayable message is built once, in [`ExternalLibraryError::new`],
/// so it survives being handled as a plain [`Failure`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExternalLibraryError {
    message: String,
    reason: String,
    file: String,
    line: i32,
    errno: i32,
    errmsg: String,
}

impl ExternalLibraryError {
    pub fn new(
        reason: impl Into<String>,
        file: impl Into<String>,
        line: i32,
        errno: i32,
        errmsg: impl Into<String>,
    ) -> Self {
        let file = file.into();
        let errmsg = errmsg.into();
        let message = format!("Numerical library error at {file}:{line}: {errmsg} ({errno})");
        Self {
            message,
            reason: reason.into(),
            file,
            line,
            errno,
            errmsg,
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> i32 {
        self.line
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn errmsg(&self) -> &str {
        &self.errmsg
    }
}

impl From<ComponentNotFound> for Failure {
    fn from(err: ComponentNotFound) -> Self {
        Failure::InvalidData(err.into())
    }
}

impl From<HaloNotFound> for InvalidData {
    fn from(err: HaloNotFound) -> Self {
        InvalidData::ComponentNotFound(err.into())
    }
}

impl From<SubhaloNotFound> for InvalidData {
    fn from(err: SubhaloNotFound) -> Self {
        InvalidData::ComponentNotFound(err.into())
    }
}

impl From<HaloNotFound> for Failure {
    fn from(err: HaloNotFound) -> Self {
        Failure::InvalidData(err.into())
    }
}

impl From<SubhaloNotFound> for Failure {
    fn from(err: SubhaloNotFound) -> Self {
        Failure::InvalidData(err.into())
    }
}

impl From<ExternalLibraryError> for Failure {
    fn from(err: ExternalLibraryError) -> Self {
        Failure::Math(err.into())
    }
}

impl Failure {
    /// The most specific node of the taxonomy this failure belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::InvalidOption(_) => FailureKind::InvalidOption,
            Failure::InvalidArgument(_) => FailureKind::InvalidArgument,
            Failure::MissingOption(_) => FailureKind::MissingOption,
            Failure::InvalidData(InvalidData::ComponentNotFound(c)) => match c {
                ComponentNotFound::Component(_) => FailureKind::ComponentNotFound,
                ComponentNotFound::Halo(_) => FailureKind::HaloNotFound,
                ComponentNotFound::Subhalo(_) => FailureKind::SubhaloNotFound,
            },
            Failure::InvalidData(_) => FailureKind::InvalidData,
            Failure::Math(MathError::ExternalLibrary(_)) => FailureKind::ExternalLibrary,
            Failure::Math(_) => FailureKind::MathError,
            Failure::Io(_) => FailureKind::Io,
        }
    }

    /// Shorthand for `self.kind().is_a(ancestor)`.
    pub fn is_a(&self, ancestor: FailureKind) -> bool {
        self.kind().is_a(ancestor)
    }

    pub fn as_invalid_data(&self) -> Option<&InvalidData> {
        match self {
            Failure::InvalidData(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_component_not_found(&self) -> Option<&ComponentNotFound> {
        match self.as_invalid_data()? {
            InvalidData::ComponentNotFound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_halo_not_found(&self) -> Option<&HaloNotFound> {
        match self.as_component_not_found()? {
            ComponentNotFound::Halo(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_subhalo_not_found(&self) -> Option<&SubhaloNotFound> {
        match self.as_component_not_found()? {
            ComponentNotFound::Subhalo(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_math_error(&self) -> Option<&MathError> {
        match self {
            Failure::Math(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_external_library_error(&self) -> Option<&ExternalLibraryError> {
        match self.as_math_error()? {
            MathError::ExternalLibrary(e) => Some(e),
            _ => None,
        }
    }
}

/// One node of the failure hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Failure,
    InvalidOption,
    InvalidArgument,
    MissingOption,
    InvalidData,
    ComponentNotFound,
    HaloNotFound,
    SubhaloNotFound,
    MathError,
    ExternalLibrary,
    Io,
}

/// Broad grouping used when reporting failures to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    UserInput,
    DataIntegrity,
    Computation,
    Environment,
}

impl FailureKind {
    #[must_use]
    pub const fn parent(self) -> Option<FailureKind> {
        match self {
            Self::Failure => None,
            Self::InvalidOption
            | Self::InvalidArgument
            | Self::MissingOption
            | Self::InvalidData
            | Self::MathError
            | Self::Io => Some(Self::Failure),
            Self::ComponentNotFound => Some(Self::InvalidData),
            Self::HaloNotFound | Self::SubhaloNotFound => Some(Self::ComponentNotFound),
            Self::ExternalLibrary => Some(Self::MathError),
        }
    }

    /// Whether `self` is `ancestor` or one of its descendants.
    pub fn is_a(self, ancestor: FailureKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// `None` only for the root, which is never the kind of a concrete failure.
    #[must_use]
    pub const fn category(self) -> Option<FailureCategory> {
        match self {
            Self::Failure => None,
            Self::InvalidOption | Self::InvalidArgument | Self::MissingOption => {
                Some(FailureCategory::UserInput)
            }
            Self::InvalidData
            | Self::ComponentNotFound
            | Self::HaloNotFound
            | Self::SubhaloNotFound => Some(FailureCategory::DataIntegrity),
            Self::MathError | Self::ExternalLibrary => Some(FailureCategory::Computation),
            Self::Io => Some(FailureCategory::Environment),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::InvalidOption => "invalid option",
            Self::InvalidArgument => "invalid argument",
            Self::MissingOption => "missing option",
            Self::InvalidData => "invalid data",
            Self::ComponentNotFound => "component not found",
            Self::HaloNotFound => "halo not found",
            Self::SubhaloNotFound => "subhalo not found",
            Self::MathError => "math error",
            Self::ExternalLibrary => "external library error",
            Self::Io => "i/o error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type Result<T> = std::result::Result<T, Failure>;
