//! sled-backed project store, keyed by record id.

use std::path::Path;

use sled::Db;

use crate::errors::{DssError, DssResult};
use crate::project::ProjectRecord;
use crate::store::ProjectStore;

pub struct SledProjectStore {
    db: Db,
}

impl SledProjectStore {
    pub fn open(path: impl AsRef<Path>) -> DssResult<Self> {
        let db = sled::open(path.as_ref())?;
        Ok(Self { db })
    }

    fn tree(&self) -> DssResult<sled::Tree> {
        self.db
            .open_tree("projects")
            .map_err(|e| DssError::store("open projects tree", e))
    }
}

impl ProjectStore for SledProjectStore {
    fn load(&self) -> DssResult<Vec<ProjectRecord>> {
        let tree = self.tree()?;
        let mut records = Vec::new();
        for item in tree.iter() {
            let (_, bytes) = item?;
            let record: ProjectRecord = serde_json::from_slice(&bytes)
                .map_err(|e| DssError::serialization("project record", e))?;
            records.push(record);
        }
        // Big-endian keys keep iteration ordered by id already; sort anyway
        // so the contract does not depend on the key encoding.
        records.sort_by_key(|r| r.id);
        tracing::debug!(count = records.len(), "loaded project records");
        Ok(records)
    }

    fn save(&self, records: &[ProjectRecord]) -> DssResult<()> {
        let tree = self.tree()?;
        tree.clear()?;
        for record in records {
            let bytes = serde_json::to_vec(record)
                .map_err(|e| DssError::serialization("project record", e))?;
            tree.insert(record.id.to_be_bytes(), bytes)?;
        }
        tree.flush()?;
        tracing::debug!(count = records.len(), "saved project records");
        Ok(())
    }
}
