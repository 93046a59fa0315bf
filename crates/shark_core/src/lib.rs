pub mod dataset;
pub mod error;
pub mod file;
pub mod group;
pub mod location;
pub mod marshal;
pub mod math;
pub mod options;
mod traits;
mod types;

pub use dataset::DataSet;
pub use error::{
    ComponentNotFound, ExternalLibraryError, Failure, FailureCategory, FailureKind, HaloNotFound,
    InvalidData, MathError, Result, SubhaloNotFound,
};
pub use file::File;
pub use group::{AbstractGroup, Group};
pub use location::Location;
pub use marshal::{fill_probe, string_from_api};
pub use options::Options;
pub use traits::{Store, StoreResult, StoreStatus};
pub use types::{DataSpace, DataType, HaloId, NativeId, ObjectKind, SubhaloId};
