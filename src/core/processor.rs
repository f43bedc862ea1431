use crate::core::{parser, validator};
use crate::domain::model::{FileOutcome, ProcessingReport};
use crate::domain::ports::{SimStore, Storage};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Runs parse → validate → persist for one input file and leaves an
/// `<stem>.ok` or `<stem>.nok` marker in the output storage.
pub struct FileProcessor<S: SimStore, St: Storage> {
    store: S,
    output: St,
}

impl<S: SimStore, St: Storage> FileProcessor<S, St> {
    pub fn new(store: S, output: St) -> Self {
        Self { store, output }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn process(&self, path: &Path) -> Result<ProcessingReport> {
        tracing::info!("📥 Processing file: {}", path.display());
        let file = path.display().to_string();

        let data = match parser::parse_file(path).await {
            Ok(data) => data,
            Err(e) => {
                self.write_marker(path, FileOutcome::Nok).await;
                return Err(e);
            }
        };

        let data = match validator::validate(data, &self.store).await {
            Ok(data) => data,
            Err(e) => {
                self.write_marker(path, FileOutcome::Nok).await;
                return Err(e);
            }
        };

        // 不包交易：中途失敗時已寫入的資料會留著
        let mut inserted = 0;
        for record in &data.records {
            if let Err(e) = self.store.insert_record(record).await {
                tracing::error!(
                    "❌ Failed to insert IMSI {} after {} records: {}",
                    record.imsi,
                    inserted,
                    e
                );
                self.write_marker(path, FileOutcome::Nok).await;
                ProcessingReport::new(&file, &data, inserted, FileOutcome::Nok).log();
                return Err(e);
            }
            inserted += 1;
        }

        self.write_marker(path, FileOutcome::Ok).await;

        let report = ProcessingReport::new(file, &data, inserted, FileOutcome::Ok);
        report.log();
        Ok(report)
    }

    async fn write_marker(&self, input: &Path, outcome: FileOutcome) {
        let Some(name) = marker_name(input, outcome) else {
            tracing::error!("Cannot derive a marker name from {}", input.display());
            return;
        };

        match self.output.write_file(&name, &[]).await {
            Ok(()) => tracing::info!("🏁 Created result file: {}", name.display()),
            Err(e) => tracing::error!("Failed to create result file {}: {}", name.display(), e),
        }
    }
}

/// `inputs/batch_01.txt` → `batch_01.ok` / `batch_01.nok`
///
/// The stem is kept as raw `OsStr`, so names that are not valid UTF-8 still
/// get a marker. `None` only when the path has no file name at all.
pub fn marker_name(input: &Path, outcome: FileOutcome) -> Option<PathBuf> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".");
    name.push(outcome.extension());
    Some(PathBuf::from(name))
}
