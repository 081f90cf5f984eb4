//! Flat-file JSON backend, the successor of the original `projects.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{DssError, DssResult};
use crate::project::ProjectRecord;
use crate::store::ProjectStore;

/// Stores the whole record list as one pretty-printed JSON array.
///
/// Not safe for concurrent writers; the service keeps it behind a mutex in
/// `AppState`, which matches the original's single flat file.
pub struct JsonProjectStore {
    path: PathBuf,
}

impl JsonProjectStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProjectStore for JsonProjectStore {
    fn load(&self) -> DssResult<Vec<ProjectRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| DssError::io(format!("reading {}", self.path.display()), e))?;
        let records: Vec<ProjectRecord> = serde_json::from_str(&content)
            .map_err(|e| DssError::serialization("projects file", e))?;
        tracing::debug!(count = records.len(), "loaded project records");
        Ok(records)
    }

    fn save(&self, records: &[ProjectRecord]) -> DssResult<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| DssError::serialization("projects file", e))?;

        // Write to a sibling temp file first so a failed write cannot
        // truncate the live data file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| DssError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| DssError::io(format!("replacing {}", self.path.display()), e))?;

        tracing::debug!(count = records.len(), "saved project records");
        Ok(())
    }
}
