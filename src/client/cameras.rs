//! Cameras Sync
//!
//! Keeps the camera list in sync with the backend and fans out one
//! snapshot request per camera once the list is visible. Each snapshot
//! task patches only its own camera, by id, and settles it exactly once.
//! Create, update and delete round-trip through the backend and then patch
//! the local list instead of refetching it.
//!
//! Top-level `is_loading` stays set while any list fetch or mutation is in
//! flight, not just the one that finished last.
//!
//! ## Snapshot handles
//!
//! Image bytes live in a [`SnapshotRegistry`] owned by the unit; cameras
//! only carry a [`SnapshotHandle`]. Handles are released when a refetch
//! replaces the list, when their camera is deleted and when the unit is
//! disposed.

use crate::client::api::ApiClient;
use crate::client::snapshots::SnapshotRegistry;
use crate::client::sync::{Liveness, SyncMetrics, SyncState, Ticket};
use crate::shared::camera::{CameraInput, CameraRecord, CameraWithSnapshot, SnapshotHandle};
use crate::shared::error::ApiError;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub type CamerasState = SyncState<Vec<CameraWithSnapshot>>;

struct CamerasInner {
    api: ApiClient,
    state: watch::Sender<CamerasState>,
    liveness: Liveness,
    snapshots: SnapshotRegistry,
    metrics: Mutex<SyncMetrics>,
    /// List fetches and mutations in flight, only touched under the state lock
    in_flight: AtomicUsize,
    skip: u32,
    limit: u32,
}

impl CamerasInner {
    fn metrics(&self) -> MutexGuard<'_, SyncMetrics> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `update` unless the unit has been disposed
    fn publish(&self, update: impl FnOnce(&mut CamerasState)) -> bool {
        self.state.send_if_modified(|state| {
            if self.liveness.is_disposed() {
                return false;
            }
            update(state);
            true
        })
    }

    /// Mark a request as started
    fn begin(&self) -> bool {
        self.publish(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.begin_mutation();
        })
    }

    /// Apply the outcome of a request started with [`begin`](Self::begin)
    fn finish(&self, update: impl FnOnce(&mut CamerasState)) -> bool {
        self.publish(|state| {
            update(state);
            let remaining = self.in_flight.load(Ordering::SeqCst).saturating_sub(1);
            self.in_flight.store(remaining, Ordering::SeqCst);
            state.is_loading = remaining > 0;
        })
    }

    fn fail(&self, context: &str, err: &ApiError) {
        tracing::warn!(error = %err, "{}", context);
        let message = format!("{}. {}", context, err.user_message());
        self.finish(|state| state.fail(message));
    }

    /// Input rejected locally; no request was started
    fn reject(&self, context: &str, err: &ApiError) {
        tracing::warn!(error = %err, "{}", context);
        let message = format!("{}. {}", context, err.user_message());
        self.publish(|state| state.error_message = Some(message));
    }
}

/// Cameras sync unit.
///
/// Must be created inside a Tokio runtime. Dropping it disposes it.
pub struct CamerasSync {
    inner: Arc<CamerasInner>,
}

impl CamerasSync {
    /// Start observing the camera list using the configured page size
    pub fn observe(api: ApiClient) -> Self {
        let limit = api.config().camera_page_size();
        Self::observe_with_page(api, 0, limit)
    }

    pub fn observe_with_page(api: ApiClient, skip: u32, limit: u32) -> Self {
        let (state, _) = watch::channel(CamerasState::default());
        let inner = Arc::new(CamerasInner {
            api,
            state,
            liveness: Liveness::new(),
            snapshots: SnapshotRegistry::new(),
            metrics: Mutex::new(SyncMetrics::new()),
            in_flight: AtomicUsize::new(0),
            skip,
            limit,
        });
        tokio::spawn(fetch_all(Arc::clone(&inner)));
        Self { inner }
    }

    /// Refetch the whole list, then fan out snapshot requests.
    ///
    /// Never fails: errors land in `error_message` and the previous list
    /// stays in place.
    pub async fn fetch_all(&self) {
        fetch_all(Arc::clone(&self.inner)).await;
    }

    /// Create a camera and append it to the list.
    ///
    /// On failure the list is untouched, `error_message` is set and the
    /// error is returned so the caller can keep its form open.
    pub async fn add_camera(&self, input: CameraInput) -> Result<CameraRecord, ApiError> {
        let inner = &self.inner;
        if let Err(err) = input.validate() {
            let err = ApiError::from(err);
            inner.reject("Failed to add camera", &err);
            return Err(err);
        }
        inner.begin();

        let created = match inner.api.create_camera(&input).await {
            Ok(created) => created,
            Err(err) => {
                inner.fail("Failed to add camera", &err);
                return Err(err);
            }
        };

        // The ticket must belong to the list the camera is appended to.
        let mut ticket = None;
        inner.finish(|state| {
            ticket = Some(inner.liveness.ticket());
            state.data.push(CameraWithSnapshot::pending(created.clone()));
        });
        if let (Some(id), Some(ticket)) = (created.id, ticket) {
            tokio::spawn(load_snapshot(Arc::clone(inner), id, ticket));
        }
        tracing::info!(camera_id = ?created.id, name = %created.name, "camera added");
        Ok(created)
    }

    /// Update a camera's fields in place; its snapshot is kept as is.
    pub async fn update_camera(&self, id: i64, input: CameraInput) -> Result<CameraRecord, ApiError> {
        let inner = &self.inner;
        if let Err(err) = input.validate() {
            let err = ApiError::from(err);
            inner.reject("Failed to update camera", &err);
            return Err(err);
        }
        inner.begin();

        let updated = match inner.api.update_camera(id, &input).await {
            Ok(updated) => updated,
            Err(err) => {
                inner.fail("Failed to update camera", &err);
                return Err(err);
            }
        };

        inner.finish(|state| {
            if let Some(camera) = state.data.iter_mut().find(|c| c.id() == Some(id)) {
                camera.camera = CameraRecord {
                    id: Some(id),
                    ..updated.clone()
                };
            }
        });
        tracing::info!(camera_id = id, "camera updated");
        Ok(updated)
    }

    /// Delete a camera and drop it from the list. Confirming intent is the
    /// caller's job.
    pub async fn delete_camera(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        let inner = &self.inner;
        inner.begin();

        let confirmation = match inner.api.delete_camera(id).await {
            Ok(confirmation) => confirmation,
            Err(err) => {
                inner.fail("Failed to delete camera", &err);
                return Err(err);
            }
        };

        let mut released = None;
        inner.finish(|state| {
            if let Some(index) = state.data.iter().position(|c| c.id() == Some(id)) {
                released = state.data.remove(index).snapshot;
            }
        });
        if let Some(handle) = released {
            inner.snapshots.release(handle);
        }
        tracing::info!(camera_id = id, "camera deleted");
        Ok(confirmation)
    }

    pub fn state(&self) -> CamerasState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CamerasState> {
        self.inner.state.subscribe()
    }

    /// Stream of published states, starting with the current one
    pub fn updates(&self) -> WatchStream<CamerasState> {
        WatchStream::new(self.subscribe())
    }

    /// Image bytes behind a handle, while it is live
    pub fn snapshot(&self, handle: SnapshotHandle) -> Option<Bytes> {
        self.inner.snapshots.get(handle)
    }

    /// Number of snapshot handles currently held
    pub fn live_snapshots(&self) -> usize {
        self.inner.snapshots.len()
    }

    pub fn metrics(&self) -> SyncMetrics {
        self.inner.metrics().clone()
    }

    /// Ignore every response still in flight and release all snapshot handles
    pub fn dispose(&self) {
        let inner = &self.inner;
        inner.state.send_if_modified(|_| {
            inner.liveness.dispose();
            inner.snapshots.release_all();
            false
        });
    }
}

impl Drop for CamerasSync {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn fetch_all(inner: Arc<CamerasInner>) {
    if !inner.begin() {
        return;
    }
    inner.metrics().record_fetch_start();
    let started = Instant::now();

    let records = match inner.api.list_cameras(inner.skip, inner.limit).await {
        Ok(records) => records,
        Err(err) => {
            inner.metrics().record_fetch_failure(started.elapsed());
            inner.fail("Failed to fetch cameras", &err);
            return;
        }
    };
    let elapsed = started.elapsed();

    let cameras: Vec<CameraWithSnapshot> = records.into_iter().map(CameraWithSnapshot::pending).collect();
    let ids: Vec<i64> = cameras.iter().filter_map(CameraWithSnapshot::id).collect();

    // A new list is a new epoch: snapshot tasks of the previous one go stale.
    let mut ticket = None;
    let mut superseded = Vec::new();
    inner.finish(|state| {
        ticket = Some(inner.liveness.advance());
        superseded = state.succeed(cameras);
    });
    let Some(ticket) = ticket else {
        inner.metrics().record_discarded();
        tracing::debug!("discarding camera list for a disposed subscription");
        return;
    };
    inner.metrics().record_fetch_success(elapsed);
    inner
        .snapshots
        .release_many(superseded.into_iter().filter_map(|camera| camera.snapshot));
    tracing::debug!(count = ids.len(), "camera list refreshed, fetching snapshots");

    for id in ids {
        tokio::spawn(load_snapshot(Arc::clone(&inner), id, ticket));
    }
}

/// Fetch one camera's snapshot and settle that camera, and only that one.
async fn load_snapshot(inner: Arc<CamerasInner>, id: i64, ticket: Ticket) {
    let image = match inner.api.camera_snapshot(id).await {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(camera_id = id, error = %err, "could not fetch snapshot");
            None
        }
    };

    let settled = inner.state.send_if_modified(|state| {
        if !inner.liveness.is_current(ticket) {
            return false;
        }
        let Some(camera) = state
            .data
            .iter_mut()
            .find(|c| c.id() == Some(id) && c.snapshot_loading)
        else {
            return false;
        };
        camera.snapshot = image.map(|bytes| inner.snapshots.insert(bytes));
        camera.snapshot_loading = false;
        true
    });
    if !settled {
        tracing::debug!(camera_id = id, "discarding snapshot for a stale camera list");
    }
}
