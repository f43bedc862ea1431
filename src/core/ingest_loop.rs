use crate::core::processor::FileProcessor;
use crate::domain::ports::{HandledTracker, SimStore, Storage};
use crate::utils::error::{IngestError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Counts for one scanning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub deleted: usize,
}

/// Polls the input folder forever: scan, hand new files to the processor, sleep.
pub struct IngestLoop<S: SimStore, St: Storage, T: HandledTracker> {
    processor: FileProcessor<S, St>,
    tracker: T,
    input_folder: PathBuf,
    scan_interval: Duration,
}

impl<S: SimStore, St: Storage, T: HandledTracker> IngestLoop<S, St, T> {
    pub fn new(
        processor: FileProcessor<S, St>,
        tracker: T,
        input_folder: impl Into<PathBuf>,
        scan_interval: Duration,
    ) -> Self {
        Self {
            processor,
            tracker,
            input_folder: input_folder.into(),
            scan_interval,
        }
    }

    pub fn processor(&self) -> &FileProcessor<S, St> {
        &self.processor
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Never returns; the process is stopped from outside.
    pub async fn run(&mut self) {
        tracing::info!(
            "🚀 Watching {} every {:?}",
            self.input_folder.display(),
            self.scan_interval
        );

        loop {
            if let Err(e) = self.scan_once().await {
                tracing::error!("❌ Error scanning folder: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            }

            tokio::time::sleep(self.scan_interval).await;
        }
    }

    /// One scanning pass. Only a folder that cannot be listed is an error;
    /// per-file failures are logged and counted.
    pub async fn scan_once(&mut self) -> Result<ScanSummary> {
        let files = scan_folder(&self.input_folder).await?;
        let mut summary = ScanSummary::default();

        for file in files {
            if self.tracker.is_handled(&file) {
                tracing::info!("File is already processed, deleting: {}", file.display());
                match tokio::fs::remove_file(&file).await {
                    Ok(()) => summary.deleted += 1,
                    Err(e) => tracing::warn!("Failed to delete {}: {}", file.display(), e),
                }
                continue;
            }

            summary.processed += 1;
            match self.processor.process(&file).await {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("❌ Error processing file {}: {}", file.display(), e);
                }
            }
            self.tracker.mark_handled(&file);
        }

        if summary.processed > 0 || summary.deleted > 0 {
            tracing::info!(
                "Scan finished: {} processed ({} ok, {} failed), {} deleted",
                summary.processed,
                summary.succeeded,
                summary.failed,
                summary.deleted
            );
        }

        Ok(summary)
    }
}

/// Lists the non-directory entries of `folder`, sorted by name.
pub async fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    let scan_error = |source: std::io::Error| IngestError::Scan {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(scan_error)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(scan_error)? {
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if !file_type.is_dir() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
