//! Snapshot Registry
//!
//! Holds the image bytes behind every [`SnapshotHandle`] a camera sync unit
//! has handed out. A handle stays resolvable until it is released: when its
//! camera is deleted, when a list refetch supersedes it, or when the unit
//! is disposed.

use crate::shared::camera::SnapshotHandle;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    next_id: AtomicU64,
    images: Mutex<HashMap<SnapshotHandle, Bytes>>,
}

impl SnapshotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn images(&self) -> MutexGuard<'_, HashMap<SnapshotHandle, Bytes>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.images.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store an image and hand out a fresh handle for it
    pub fn insert(&self, image: Bytes) -> SnapshotHandle {
        let handle = SnapshotHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.images().insert(handle, image);
        handle
    }

    pub fn get(&self, handle: SnapshotHandle) -> Option<Bytes> {
        self.images().get(&handle).cloned()
    }

    /// Returns whether the handle was still live
    pub fn release(&self, handle: SnapshotHandle) -> bool {
        self.images().remove(&handle).is_some()
    }

    pub fn release_many(&self, handles: impl IntoIterator<Item = SnapshotHandle>) -> usize {
        let mut images = self.images();
        handles
            .into_iter()
            .filter(|handle| images.remove(handle).is_some())
            .count()
    }

    pub fn release_all(&self) -> usize {
        let mut images = self.images();
        let released = images.len();
        images.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.images().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
