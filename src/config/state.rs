// Shared application state
// Read-only configuration handed to every request

use std::sync::atomic::AtomicBool;

use super::types::Config;

pub struct AppState {
    pub config: Config,

    // Cached toggle for fast access without reading config on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
