use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 檔案開頭宣告的數量與起始 IMSI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub quantity: usize,
    /// Starting IMSI of the expected contiguous block, kept as the raw decimal string.
    pub starting_imsi: String,
}

/// One provisioning line. Every field is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRecord {
    pub imsi: String,
    pub pin1: String,
    pub puk1: String,
    pub pin2: String,
    pub puk2: String,
    pub aam1: String,
    pub ki_umts_enc: String,
    pub acc: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub invalid_imsi_range_count: usize,
    pub duplicate_imsi_in_file: usize,
    pub already_existing_imsi: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub header: Header,
    pub records: Vec<SimRecord>,
    pub validation: ValidationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutcome {
    Ok,
    Nok,
}

impl FileOutcome {
    /// Extension of the marker file written to the output folder.
    pub fn extension(self) -> &'static str {
        match self {
            FileOutcome::Ok => "ok",
            FileOutcome::Nok => "nok",
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Summary of one processed file, emitted once validation has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub file: String,
    pub quantity: usize,
    pub records_processed: usize,
    pub records_inserted: usize,
    pub duplicate_imsi_in_file: usize,
    pub already_existing_imsi: usize,
    pub invalid_imsi_range_count: usize,
    pub outcome: FileOutcome,
    pub processed_at: DateTime<Utc>,
}

impl ProcessingReport {
    pub fn new(
        file: impl Into<String>,
        data: &FileData,
        records_inserted: usize,
        outcome: FileOutcome,
    ) -> Self {
        let v = data.validation;
        // 與舊版報表相同的算法：宣告數量扣掉三種被排除的筆數
        let records_processed = data
            .header
            .quantity
            .saturating_sub(v.already_existing_imsi)
            .saturating_sub(v.duplicate_imsi_in_file)
            .saturating_sub(v.invalid_imsi_range_count);

        Self {
            file: file.into(),
            quantity: data.header.quantity,
            records_processed,
            records_inserted,
            duplicate_imsi_in_file: v.duplicate_imsi_in_file,
            already_existing_imsi: v.already_existing_imsi,
            invalid_imsi_range_count: v.invalid_imsi_range_count,
            outcome,
            processed_at: Utc::now(),
        }
    }

    pub fn log(&self) {
        tracing::info!("---------------- File Processing Report -----------------");
        tracing::info!("📄 File: {}", self.file);
        tracing::info!("Total Records In File Quantity: {}", self.quantity);
        tracing::info!("Total Records Processed: {}", self.records_processed);
        tracing::info!("Total Records Inserted In DB: {}", self.records_inserted);
        tracing::info!("Total Duplicate IMSI Records In File: {}", self.duplicate_imsi_in_file);
        tracing::info!("Total Already Existing IMSI Records: {}", self.already_existing_imsi);
        tracing::info!("Total Out Of Range IMSI Records: {}", self.invalid_imsi_range_count);
        tracing::info!("Result: {}", self.outcome);
        tracing::info!("---------------- File Processing Completed -----------------");

        match serde_json::to_string(self) {
            Ok(json) => tracing::debug!(report = %json, "processing report"),
            Err(e) => tracing::warn!("Failed to serialize processing report: {}", e),
        }
    }
}
