// Shared runtime state handed to every connection task

use super::types::Config;

pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Whether per-request access lines are written
    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
