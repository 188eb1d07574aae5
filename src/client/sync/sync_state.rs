//! # Sync State Management
//!
//! The loading/error/data tri-state published by every sync unit.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl<T: Default> Default for SyncState<T> {
    /// Nothing fetched yet; the first fetch is about to start.
    fn default() -> Self {
        Self {
            data: T::default(),
            is_loading: true,
            error_message: None,
        }
    }
}

impl<T> SyncState<T> {
    /// A request is in flight. The previous error stays visible until it
    /// is resolved either way.
    pub fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Mutations clear the previous error as soon as they start.
    pub fn begin_mutation(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Replace the data wholesale and clear any error
    pub fn succeed(&mut self, data: T) -> T {
        self.is_loading = false;
        self.error_message = None;
        std::mem::replace(&mut self.data, data)
    }

    /// Keep the data, record the failure
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error_message = Some(message.into());
    }
}
