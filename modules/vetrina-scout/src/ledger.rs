//! Ledger: the durable, keyed registry of business records.
//!
//! Upsert-by-key from the start — no append-and-dedup-later. Merge is
//! ordered by `BusinessStatus::lifecycle_rank`, so a re-run with stale or
//! partial data never drags a record backwards: a `NoSite` produced by a
//! transient directory glitch can't overwrite a `Scored` entry.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};
use vetrina_common::{BusinessRecord, BusinessStatus, VetrinaError};

pub struct Ledger {
    path: PathBuf,
    records: Mutex<BTreeMap<String, BusinessRecord>>,
}

impl Ledger {
    /// Open the ledger at `path`, restoring prior progress if the file
    /// exists. A missing file is a fresh start, not an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VetrinaError> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)
                .map_err(|e| VetrinaError::Ledger(format!("read {}: {e}", path.display())))?;
            let list: Vec<BusinessRecord> = serde_json::from_str(&data)
                .map_err(|e| VetrinaError::Ledger(format!("parse {}: {e}", path.display())))?;
            let mut map = BTreeMap::new();
            for record in list {
                map.insert(record.name.clone(), record);
            }
            info!(path = %path.display(), count = map.len(), "Restored ledger");
            map
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Merge one record. Inserts when the name is new; otherwise replaces
    /// the stored record only when the incoming lifecycle rank is at least
    /// the stored one (equal rank refreshes, so re-evaluation works).
    /// Idempotent: merging the same record twice leaves the same state.
    pub fn merge(&self, record: BusinessRecord) {
        if record.name.trim().is_empty() {
            warn!("Dropping record with empty name");
            return;
        }

        let mut records = self.records.lock().unwrap();
        match records.get(&record.name) {
            Some(stored)
                if record.status.lifecycle_rank() < stored.status.lifecycle_rank() =>
            {
                debug!(
                    name = %record.name,
                    stored = %stored.status,
                    incoming = %record.status,
                    "Merge kept the more advanced stored record"
                );
            }
            _ => {
                records.insert(record.name.clone(), record);
            }
        }
    }

    /// Full current registry, ordered by name.
    pub fn snapshot(&self) -> Vec<BusinessRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    /// Records currently in a given status ("has site" / "no site" are
    /// views of this one store, not separate stores).
    pub fn with_status(&self, status: BusinessStatus) -> Vec<BusinessRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Records without a verified site, all eligible for (re-)resolution.
    /// Unverified businesses are re-queried every run — a site that didn't
    /// exist or didn't rank last month may do so now.
    pub fn pending_resolution(&self) -> Vec<BusinessRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| {
                matches!(
                    r.status,
                    BusinessStatus::NoSite
                        | BusinessStatus::SiteUnverified
                        | BusinessStatus::ScoreFailed
                )
            })
            .cloned()
            .collect()
    }

    /// Records that carry a site and still need scoring.
    pub fn pending_scoring(&self) -> Vec<BusinessRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| {
                matches!(
                    r.status,
                    BusinessStatus::HasSite | BusinessStatus::SiteVerified
                )
            })
            .cloned()
            .collect()
    }

    /// Persist the registry atomically: write a temp file in the target
    /// directory, then rename over the old one. A crash mid-stage loses at
    /// most the in-flight stage, never prior progress.
    pub fn save(&self) -> Result<(), VetrinaError> {
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| VetrinaError::Ledger(format!("serialize: {e}")))?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| VetrinaError::Ledger(format!("create temp file: {e}")))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| VetrinaError::Ledger(format!("write temp file: {e}")))?;
        tmp.persist(&self.path)
            .map_err(|e| VetrinaError::Ledger(format!("persist {}: {e}", self.path.display())))?;

        info!(path = %self.path.display(), count = snapshot.len(), "Ledger saved");
        Ok(())
    }
}
