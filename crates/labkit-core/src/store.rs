//! Persistence port
//!
//! Layout snapshots and the saved-sequence library are persisted as whole
//! values through this trait. Writes overwrite the previous value; there is no
//! concurrent-writer protection since only one interactive session exists.

use crate::error::StoreError;
use std::sync::Arc;

/// Load/save a complete snapshot of type `T`.
pub trait SnapshotStore<T>: Send + Sync {
    /// Load the last saved snapshot, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<T>, StoreError>;

    /// Replace the stored snapshot.
    fn save(&self, value: &T) -> Result<(), StoreError>;
}

impl<T, S> SnapshotStore<T> for Box<S>
where
    S: SnapshotStore<T> + ?Sized,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        (**self).save(value)
    }
}

impl<T, S> SnapshotStore<T> for Arc<S>
where
    S: SnapshotStore<T> + ?Sized,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        (**self).save(value)
    }
}
