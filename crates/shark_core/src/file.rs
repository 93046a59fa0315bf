use std::sync::Arc;

use tracing::info;

use crate::error::{Failure, Result};
use crate::group::AbstractGroup;
use crate::location::Location;
use crate::traits::Store;
use crate::types::{NativeId, ObjectKind};

/// The root container of a store file.
///
/// Like [`Group`](crate::Group) it owns its handle and closes it on drop.
/// Groups and datasets opened from a file keep their own handles, so they
/// stay usable after the `File` is gone.
#[derive(Debug)]
pub struct File {
    location: Location,
    name: String,
}

impl File {
    pub fn create(store: Arc<dyn Store>, name: &str) -> Result<Self> {
        Self::check_name(name)?;
        let id = store
            .file_create(name)
            .map_err(|s| s.into_failure(format!("creating file '{name}'")))?;
        info!(%id, name, "created file");
        Self::from_id(store, id, name)
    }

    pub fn open(store: Arc<dyn Store>, name: &str) -> Result<Self> {
        Self::check_name(name)?;
        let id = store
            .file_open(name)
            .map_err(|s| s.into_failure(format!("opening file '{name}'")))?;
        info!(%id, name, "opened file");
        Self::from_id(store, id, name)
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Failure::InvalidArgument("File name is empty".into()));
        }
        Ok(())
    }

    fn from_id(store: Arc<dyn Store>, id: NativeId, name: &str) -> Result<Self> {
        Ok(Self {
            location: Location::new(store, ObjectKind::File, id)?,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn close(self) -> Result<()> {
        self.location.close()
    }
}

impl AbstractGroup for File {
    fn location(&self) -> &Location {
        &self.location
    }

    fn path(&self) -> &str {
        "/"
    }
}
