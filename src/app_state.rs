use std::sync::Mutex;

use crate::config::DssConfig;
use crate::errors::{DssResult, SafeLock};
use crate::project::ProjectRecord;
use crate::store::ProjectStore;

/// Shared request-handler state: the injected repository plus the matching
/// knobs lifted from configuration.
pub struct AppState {
    pub store: Mutex<Box<dyn ProjectStore>>,
    pub neighbour_threshold: usize,
    pub ranked_recommendation: bool,
}

impl AppState {
    pub fn new(store: Box<dyn ProjectStore>, config: &DssConfig) -> Self {
        Self {
            store: Mutex::new(store),
            neighbour_threshold: config.neighbour_threshold,
            ranked_recommendation: config.ranked_recommendation,
        }
    }

    /// Load the full record list fresh; each request works on its own copy.
    pub fn load_records(&self) -> DssResult<Vec<ProjectRecord>> {
        self.store.safe_lock()?.load()
    }

    pub fn save_records(&self, records: &[ProjectRecord]) -> DssResult<()> {
        self.store.safe_lock()?.save(records)
    }
}
