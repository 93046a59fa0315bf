use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Failure, Result};
use crate::traits::Store;
use crate::types::{NativeId, ObjectKind};

/// Exclusive owner of one store identifier.
///
/// A `Location` is created only from an identifier the store has just handed
/// out, and closes it exactly once, through [`Location::close`] or on drop.
/// It cannot be cloned: other code sees the identifier through
/// [`Location::handle`] but never owns it.
pub struct Location {
    store: Arc<dyn Store>,
    id: NativeId,
    kind: ObjectKind,
}

impl Location {
    /// Takes ownership of `id`, checking that it names a live object of the
    /// expected kind.
    ///
    /// An identifier of the wrong kind is closed before the error is returned.
    pub fn new(store: Arc<dyn Store>, expected: ObjectKind, id: NativeId) -> Result<Self> {
        if !id.is_valid() {
            return Err(Failure::InvalidArgument(format!(
                "Invalid {expected} handle {id}"
            )));
        }

        match store.kind_of(id) {
            Some(kind) if kind == expected => {
                debug!(%id, %kind, "acquired handle");
                Ok(Self {
                    store,
                    id,
                    kind,
                })
            }
            Some(kind) => {
                if let Err(status) = store.close(id) {
                    warn!(%id, %status, "failed to release mismatched handle");
                }
                Err(Failure::InvalidArgument(format!(
                    "Handle {id} refers to a {kind}, expected a {expected}"
                )))
            }
            None => Err(Failure::InvalidArgument(format!(
                "Handle {id} does not refer to an open object"
            ))),
        }
    }

    #[inline]
    pub fn handle(&self) -> NativeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Releases the identifier now, reporting a failed close instead of
    /// logging it.
    pub fn close(mut self) -> Result<()> {
        let id = std::mem::replace(&mut self.id, NativeId::INVALID);
        debug!(%id, kind = %self.kind, "closing handle");
        self.store
            .close(id)
            .map_err(|status| status.into_failure(format!("closing {} {id}", self.kind)))
    }
}

impl Drop for Location {
    fn drop(&mut self) {
        if !self.id.is_valid() {
            return;
        }
        match self.store.close(self.id) {
            Ok(()) => debug!(id = %self.id, kind = %self.kind, "released handle"),
            Err(status) => {
                warn!(id = %self.id, kind = %self.kind, %status, "failed to release handle")
            }
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
