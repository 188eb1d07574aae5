//! Camera Data Structures
//!
//! `CameraRecord` mirrors the backend resource, `CameraInput` is the body of
//! create/update requests and `CameraWithSnapshot` is what the camera grid
//! renders: the record plus the state of its preview image.

use crate::shared::error::SharedError;
use serde::{Deserialize, Serialize};

/// Status the backend assigns when none is given
pub const DEFAULT_CAMERA_STATUS: &str = "active";

/// Camera as returned by `GET /cameras/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub location: String,
    pub rtsp_url: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl CameraRecord {
    /// Status with the backend default applied
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_CAMERA_STATUS)
    }
}

/// Body of `POST /cameras/` and `PUT /cameras/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInput {
    pub name: String,
    pub location: String,
    pub rtsp_url: String,
}

impl CameraInput {
    pub fn new(name: impl Into<String>, location: impl Into<String>, rtsp_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            rtsp_url: rtsp_url.into(),
        }
    }

    /// All three fields are required by the camera form
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.name.trim().is_empty() {
            return Err(SharedError::validation("name", "Camera name is required"));
        }
        if self.location.trim().is_empty() {
            return Err(SharedError::validation("location", "Location is required"));
        }
        if self.rtsp_url.trim().is_empty() {
            return Err(SharedError::validation("rtsp_url", "RTSP URL is required"));
        }
        Ok(())
    }
}

/// Opaque reference to a snapshot image held by the camera sync unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SnapshotHandle(pub(crate) u64);

/// Camera record plus the state of its preview image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraWithSnapshot {
    #[serde(flatten)]
    pub camera: CameraRecord,
    pub snapshot: Option<SnapshotHandle>,
    pub snapshot_loading: bool,
}

impl CameraWithSnapshot {
    /// Freshly listed camera, waiting for its snapshot.
    ///
    /// A record without an id can never be fetched, so it starts settled.
    pub fn pending(camera: CameraRecord) -> Self {
        let snapshot_loading = camera.id.is_some();
        Self {
            camera,
            snapshot: None,
            snapshot_loading,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.camera.id
    }
}

/// Status filter on the cameras page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraStatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl CameraStatusFilter {
    pub fn matches(&self, camera: &CameraRecord) -> bool {
        match self {
            CameraStatusFilter::All => true,
            CameraStatusFilter::Active => camera.status() == "active",
            CameraStatusFilter::Inactive => camera.status() == "inactive",
        }
    }
}

/// Cameras passing `filter`, in their existing order
pub fn filter_cameras(cameras: &[CameraWithSnapshot], filter: CameraStatusFilter) -> Vec<CameraWithSnapshot> {
    cameras
        .iter()
        .filter(|c| filter.matches(&c.camera))
        .cloned()
        .collect()
}
