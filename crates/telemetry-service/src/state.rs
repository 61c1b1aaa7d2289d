//! Application state shared across handlers.
//!
//! The store is guarded by a single async mutex. A write batch is applied
//! while the lock is held, so a concurrent range query sees either none or all
//! of that batch.

use std::sync::Arc;

use telemetry_store::Store;
use tokio::sync::Mutex;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// The reading store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
    /// Configuration the service was started with.
    pub config: Config,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            config,
        })
    }
}
