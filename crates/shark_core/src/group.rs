//! Groups: the container nodes of the store.
//!
//! [`AbstractGroup`] is implemented by everything that can hold children (the
//! root [`File`](crate::File) and every [`Group`]). Navigation methods are
//! provided on the trait; implementors only expose their [`Location`] and
//! their path.

use tracing::{debug, trace};

use crate::dataset::DataSet;
use crate::error::{Failure, InvalidData, Result};
use crate::location::Location;
use crate::marshal::string_from_api;
use crate::types::{DataSpace, DataType, NativeId, ObjectKind};

/// Checks that `name` can be used as a single child name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Failure::InvalidArgument("Object name is empty".into()));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(Failure::InvalidArgument(format!(
            "Object name '{}' contains '/' or NUL",
            name.escape_default()
        )));
    }
    Ok(())
}

/// Path of `name` inside the container at `parent`.
pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Any object that can enumerate, open and create children.
pub trait AbstractGroup {
    fn location(&self) -> &Location;

    /// Absolute path of this container inside its file, `/` for the root.
    fn path(&self) -> &str;

    fn num_objs(&self) -> Result<u64> {
        let loc = self.location();
        loc.store()
            .num_objs(loc.handle())
            .map_err(|s| s.into_failure(format!("counting objects in '{}'", self.path())))
    }

    /// Name of the `idx`-th child, `0 <= idx < num_objs()`.
    fn objname_by_idx(&self, idx: u64) -> Result<String> {
        self.check_index(idx)?;
        let loc = self.location();
        let (store, handle) = (loc.store(), loc.handle());
        trace!(%handle, idx, "reading child name");
        string_from_api(|buf| store.objname_by_idx(handle, idx, buf))
    }

    fn objtype_by_idx(&self, idx: u64) -> Result<ObjectKind> {
        self.check_index(idx)?;
        let loc = self.location();
        loc.store().objtype_by_idx(loc.handle(), idx).map_err(|s| {
            s.into_failure(format!("reading type of object {idx} in '{}'", self.path()))
        })
    }

    /// Fails with [`InvalidData::IndexOutOfRange`] unless `idx < num_objs()`.
    fn check_index(&self, idx: u64) -> Result<()> {
        let len = self.num_objs()?;
        if idx >= len {
            return Err(InvalidData::IndexOutOfRange {
                index: idx,
                len,
                location: self.path().to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn child_names(&self) -> Result<Vec<String>> {
        (0..self.num_objs()?)
            .map(|idx| self.objname_by_idx(idx))
            .collect()
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.child_names()?.iter().any(|n| n == name))
    }

    fn open_group(&self, name: &str) -> Result<Group> {
        Group::open(self, name)
    }

    fn open_dataset(&self, name: &str) -> Result<DataSet> {
        DataSet::open(self, name)
    }

    fn create_group(&mut self, name: &str) -> Result<Group> {
        Group::create(self, name)
    }

    fn create_dataset(
        &mut self,
        name: &str,
        data_type: &DataType,
        data_space: &DataSpace,
    ) -> Result<DataSet> {
        DataSet::create(self, name, data_type, data_space)
    }

    fn open_or_create_group(&mut self, name: &str) -> Result<Group> {
        if self.contains(name)? {
            self.open_group(name)
        } else {
            self.create_group(name)
        }
    }

    /// Opens a nested group by a `/`-separated path relative to this one.
    fn open_path(&self, path: &str) -> Result<Group> {
        let mut components = path.split('/').filter(|c| !c.is_empty());
        let Some(first) = components.next() else {
            return Err(Failure::InvalidArgument(format!(
                "Empty group path '{path}' below '{}'",
                self.path()
            )));
        };

        let mut group = self.open_group(first)?;
        for component in components {
            group = group.open_group(component)?;
        }
        Ok(group)
    }
}

/// An open group. Owns its handle and releases it when dropped.
#[derive(Debug)]
pub struct Group {
    location: Location,
    path: String,
}

impl Group {
    /// Opens the existing child group `name` of `parent`.
    pub fn open<P>(parent: &P, name: &str) -> Result<Self>
    where
        P: AbstractGroup + ?Sized,
    {
        validate_name(name)?;
        let path = child_path(parent.path(), name);
        let loc = parent.location();
        let id = loc
            .store()
            .group_open(loc.handle(), name)
            .map_err(|s| s.into_failure(format!("opening group '{path}'")))?;
        debug!(%id, %path, "opened group");
        Self::from_id(parent, id, path)
    }

    /// Creates the child group `name` of `parent`, which must not exist yet.
    pub fn create<P>(parent: &mut P, name: &str) -> Result<Self>
    where
        P: AbstractGroup + ?Sized,
    {
        validate_name(name)?;
        let path = child_path(parent.path(), name);
        let loc = parent.location();
        let id = loc
            .store()
            .group_create(loc.handle(), name)
            .map_err(|s| s.into_failure(format!("creating group '{path}'")))?;
        debug!(%id, %path, "created group");
        Self::from_id(&*parent, id, path)
    }

    fn from_id<P>(parent: &P, id: NativeId, path: String) -> Result<Self>
    where
        P: AbstractGroup + ?Sized,
    {
        let store = parent.location().store().clone();
        let location = Location::new(store, ObjectKind::Group, id)?;
        Ok(Self { location, path })
    }

    /// Closes the group now instead of on drop.
    pub fn close(self) -> Result<()> {
        self.location.close()
    }
}

impl AbstractGroup for Group {
    fn location(&self) -> &Location {
        &self.location
    }

    fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("halos").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\0b").is_err());
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("/", "halos"), "/halos");
        assert_eq!(child_path("/halos", "h1"), "/halos/h1");
    }
}
