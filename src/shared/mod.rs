//! Shared Module
//!
//! This module contains the types shared by every part of the client:
//! backend wire models, the derived display models the dashboard renders,
//! error types and configuration.
//!
//! # Overview
//!
//! Nothing in here touches the network or the async runtime, so these types
//! can be reused by any front end that talks to the same backend.

/// Alert wire and display models
pub mod alert;

/// Camera wire and display models
pub mod camera;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use alert::{AlertKind, AlertRecord, AlertSort, AlertSummary, DisplayAlert};
pub use camera::{CameraInput, CameraRecord, CameraStatusFilter, CameraWithSnapshot, SnapshotHandle};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ApiError, SharedError};
