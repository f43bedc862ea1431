use crate::domain::model::SimRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Where marker files end up. Paths are relative to the implementation's base.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Persistence gateway for SIM records, keyed logically by IMSI.
#[async_trait]
pub trait SimStore: Send + Sync {
    async fn insert_record(&self, record: &SimRecord) -> Result<()>;
    async fn exists_by_imsi(&self, imsi: &str) -> Result<bool>;
}

/// Remembers which input paths were already handled.
pub trait HandledTracker: Send {
    fn mark_handled(&mut self, path: &Path);
    fn is_handled(&self, path: &Path) -> bool;
}
