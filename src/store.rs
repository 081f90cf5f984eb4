//! Repository interface for project records.
//!
//! Handlers load the full record list per request, mutate it in memory,
//! and save it back; the store itself holds no request state. Backends are
//! selected by the `db_backend` config key.

use crate::config::DssConfig;
use crate::errors::DssResult;
use crate::project::ProjectRecord;
use crate::store_json::JsonProjectStore;
use crate::store_sled::SledProjectStore;

pub trait ProjectStore: Send {
    fn load(&self) -> DssResult<Vec<ProjectRecord>>;

    fn save(&self, records: &[ProjectRecord]) -> DssResult<()>;
}

/// Next free record id, continuing the original `max(id) + 1` scheme.
pub fn next_project_id(records: &[ProjectRecord]) -> u32 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

/// Open the backend named by the configuration.
pub fn open_store(config: &DssConfig) -> DssResult<Box<dyn ProjectStore>> {
    match config.db_backend.as_str() {
        "json" => Ok(Box::new(JsonProjectStore::new(&config.data_path))),
        "sled" => Ok(Box::new(SledProjectStore::open(&config.data_path)?)),
        other => Err(crate::errors::DssError::config(format!(
            "unknown db_backend '{other}' (expected 'json' or 'sled')"
        ))),
    }
}
