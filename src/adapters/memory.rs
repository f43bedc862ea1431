use crate::domain::model::SimRecord;
use crate::domain::ports::{HandledTracker, SimStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// SIM store kept in process memory. Used by `--memory-store` and by tests.
///
/// Like the SQL table it has no uniqueness constraint: inserting the same IMSI
/// twice keeps the last record.
#[derive(Debug, Clone, Default)]
pub struct InMemorySimStore {
    records: Arc<Mutex<HashMap<String, SimRecord>>>,
}

impl InMemorySimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = SimRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.imsi.clone(), r)).collect();
        Self {
            records: Arc::new(Mutex::new(map)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn get(&self, imsi: &str) -> Option<SimRecord> {
        self.records.lock().await.get(imsi).cloned()
    }
}

#[async_trait]
impl SimStore for InMemorySimStore {
    async fn insert_record(&self, record: &SimRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(record.imsi.clone(), record.clone());
        Ok(())
    }

    async fn exists_by_imsi(&self, imsi: &str) -> Result<bool> {
        Ok(self.records.lock().await.contains_key(imsi))
    }
}

/// Processed-set that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHandledSet {
    paths: HashSet<PathBuf>,
}

impl InMemoryHandledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out already knowing `paths`.
    pub fn seeded<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl HandledTracker for InMemoryHandledSet {
    fn mark_handled(&mut self, path: &Path) {
        self.paths.insert(path.to_path_buf());
    }

    fn is_handled(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}
