use tracing::debug;

use crate::error::Result;
use crate::group::{child_path, validate_name, AbstractGroup};
use crate::location::Location;
use crate::types::{DataSpace, DataType, ObjectKind};

/// An open dataset. Reading and writing its values belongs to higher layers;
/// this type only owns the handle and answers metadata queries.
#[derive(Debug)]
pub struct DataSet {
    location: Location,
    path: String,
}

impl DataSet {
    pub fn open<P>(parent: &P, name: &str) -> Result<Self>
    where
        P: AbstractGroup + ?Sized,
    {
        validate_name(name)?;
        let path = child_path(parent.path(), name);
        let loc = parent.location();
        let id = loc
            .store()
            .dataset_open(loc.handle(), name)
            .map_err(|s| s.into_failure(format!("opening dataset '{path}'")))?;
        debug!(%id, %path, "opened dataset");
        let location = Location::new(loc.store().clone(), ObjectKind::Dataset, id)?;
        Ok(Self { location, path })
    }

    pub fn create<P>(
        parent: &mut P,
        name: &str,
        data_type: &DataType,
        data_space: &DataSpace,
    ) -> Result<Self>
    where
        P: AbstractGroup + ?Sized,
    {
        validate_name(name)?;
        let path = child_path(parent.path(), name);
        let loc = parent.location();
        let id = loc
            .store()
            .dataset_create(loc.handle(), name, data_type, data_space)
            .map_err(|s| s.into_failure(format!("creating dataset '{path}'")))?;
        debug!(%id, %path, ?data_type, "created dataset");
        let location = Location::new(loc.store().clone(), ObjectKind::Dataset, id)?;
        Ok(Self { location, path })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data_type(&self) -> Result<DataType> {
        self.location
            .store()
            .dataset_type(self.location.handle())
            .map_err(|s| s.into_failure(format!("reading type of dataset '{}'", self.path)))
    }

    pub fn data_space(&self) -> Result<DataSpace> {
        self.location
            .store()
            .dataset_space(self.location.handle())
            .map_err(|s| s.into_failure(format!("reading shape of dataset '{}'", self.path)))
    }

    pub fn close(self) -> Result<()> {
        self.location.close()
    }
}
