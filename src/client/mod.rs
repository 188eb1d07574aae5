//! Dashboard Client Module
//!
//! The runtime half of the crate: the backend HTTP client and the sync
//! units that keep alerts and cameras current for a front end.
//!
//! # Architecture
//!
//! - **`config`** - Configuration wrapper (base URL, timeout, page sizes)
//! - **`api`** - Async REST client for cameras, snapshots and alerts
//! - **`sync`** - Tri-state, liveness tickets, poll scheduler, metrics
//! - **`alerts`** - Alerts sync unit with optional polling
//! - **`cameras`** - Cameras sync unit with snapshot fanout and mutations
//! - **`snapshots`** - Registry behind snapshot handles
//! - **`main`** - Terminal monitor (binary)
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs       - Module exports and documentation
//! ├── main.rs      - salama-monitor entry point
//! ├── config.rs    - Configuration management
//! ├── api.rs       - Backend HTTP client
//! ├── alerts.rs    - AlertsSync
//! ├── cameras.rs   - CamerasSync
//! ├── snapshots.rs - Snapshot handle registry
//! └── sync/        - Shared sync building blocks
//! ```

pub mod config;
pub mod api;
pub mod sync;
pub mod snapshots;
pub mod alerts;
pub mod cameras;

// Re-export commonly used types
pub use config::Config;
pub use api::ApiClient;
pub use alerts::{AlertsQuery, AlertsState, AlertsSync};
pub use cameras::{CamerasState, CamerasSync};
pub use snapshots::SnapshotRegistry;
pub use sync::{SyncMetrics, SyncState};
