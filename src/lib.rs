//! Salama - Dashboard Data Sync
//!
//! Client-side data synchronization for the Salama railway-safety
//! monitoring dashboard. The crate talks to the camera/alert REST backend
//! and keeps in-memory, observable copies of its collections for a front end
//! to render.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no runtime dependencies
//!   - Alert and camera wire models, derived display models
//!   - Error types and configuration
//!
//! - **`client`** - Tokio-based runtime code
//!   - `ApiClient` for the REST backend (fixed timeout, cookie store)
//!   - `AlertsSync`: paginated alerts, most-recent-first, optional polling
//!   - `CamerasSync`: camera list, per-camera snapshot fanout, mutations
//!
//! # Usage
//!
//! ```rust,no_run
//! use salama::client::{ApiClient, CamerasSync, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(Config::from_env()?)?;
//! let cameras = CamerasSync::observe(api);
//!
//! let mut updates = cameras.subscribe();
//! while updates.changed().await.is_ok() {
//!     let state = updates.borrow_and_update().clone();
//!     for camera in &state.data {
//!         println!("{} loading={}", camera.camera.name, camera.snapshot_loading);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # State Publication
//!
//! Every sync unit publishes a `SyncState { data, is_loading, error_message }`
//! through a `tokio::sync::watch` channel. Each list fetch publishes a full
//! replacement of `data`; snapshot results patch a single camera by id.
//!
//! # Error Handling
//!
//! - Read paths (`fetch_all`, initial and polled alert fetches) never return
//!   errors; they set `error_message` and keep the previous data.
//! - Mutations (`add_camera`, `update_camera`, `delete_camera`) set
//!   `error_message` and also return the `ApiError` to the caller.
//! - Snapshot failures only settle their own camera with no image.

/// Shared types and data structures
pub mod shared;

/// Backend client and sync units
pub mod client;
