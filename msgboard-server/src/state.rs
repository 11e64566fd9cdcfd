//! Application state shared across handlers

use std::sync::Arc;

use crate::db::MessageStore;

/// Shared application state
///
/// Holds the injected message store; handlers keep no other state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn MessageStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    pub fn store(&self) -> &dyn MessageStore {
        self.inner.store.as_ref()
    }
}
