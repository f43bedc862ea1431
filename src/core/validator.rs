use crate::domain::model::FileData;
use crate::domain::ports::SimStore;
use crate::utils::error::{IngestError, Result};
use std::collections::HashSet;

/// Validates a parsed file against itself and the store.
///
/// The returned `FileData` only holds the records that should be inserted:
/// in-file duplicates and IMSIs already present in the store are dropped and
/// counted. The range check is not repeated here, it already ran during parse.
pub async fn validate<S>(mut data: FileData, store: &S) -> Result<FileData>
where
    S: SimStore + ?Sized,
{
    if data.header.quantity != data.records.len() {
        return Err(IngestError::QuantityMismatch {
            declared: data.header.quantity,
            actual: data.records.len(),
        });
    }

    let parsed = std::mem::take(&mut data.records);
    let mut seen: HashSet<String> = HashSet::with_capacity(parsed.len());
    let mut accepted = Vec::with_capacity(parsed.len());

    for record in parsed {
        if !seen.insert(record.imsi.clone()) {
            tracing::info!("Duplicate IMSI found in file: {}", record.imsi);
            data.validation.duplicate_imsi_in_file += 1;
            continue;
        }

        if store.exists_by_imsi(&record.imsi).await? {
            tracing::info!("IMSI already exists in database: {}", record.imsi);
            data.validation.already_existing_imsi += 1;
            continue;
        }

        accepted.push(record);
    }

    data.records = accepted;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Header, SimRecord, ValidationResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockStore {
        existing: HashSet<String>,
        fail_on: Option<String>,
        queried: Mutex<Vec<String>>,
    }

    impl MockStore {
        fn new(existing: &[&str]) -> Self {
            Self {
                existing: existing.iter().map(|s| s.to_string()).collect(),
                fail_on: None,
                queried: Mutex::new(Vec::new()),
            }
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SimStore for MockStore {
        async fn insert_record(&self, _record: &SimRecord) -> Result<()> {
            unreachable!("validation never inserts")
        }

        async fn exists_by_imsi(&self, imsi: &str) -> Result<bool> {
            self.queried.lock().unwrap().push(imsi.to_string());
            if self.fail_on.as_deref() == Some(imsi) {
                return Err(IngestError::Store {
                    message: "connection reset".to_string(),
                });
            }
            Ok(self.existing.contains(imsi))
        }
    }

    fn record(imsi: &str, pin1: &str) -> SimRecord {
        SimRecord {
            imsi: imsi.to_string(),
            pin1: pin1.to_string(),
            puk1: "12345678".to_string(),
            pin2: "5678".to_string(),
            puk2: "87654321".to_string(),
            aam1: "0A".to_string(),
            ki_umts_enc: "4F1D".to_string(),
            acc: "0001".to_string(),
        }
    }

    fn file_data(quantity: usize, records: Vec<SimRecord>) -> FileData {
        FileData {
            header: Header {
                quantity,
                starting_imsi: "1".to_string(),
            },
            records,
            validation: ValidationResult::default(),
        }
    }

    fn imsis(data: &FileData) -> Vec<&str> {
        data.records.iter().map(|r| r.imsi.as_str()).collect()
    }

    #[tokio::test]
    async fn test_duplicates_removed_in_order() {
        let store = MockStore::new(&[]);
        let data = file_data(
            4,
            vec![record("A", "1"), record("B", "2"), record("A", "3"), record("C", "4")],
        );

        let result = validate(data, &store).await.unwrap();

        assert_eq!(imsis(&result), vec!["A", "B", "C"]);
        // 保留第一次出現的那筆
        assert_eq!(result.records[0].pin1, "1");
        assert_eq!(result.validation.duplicate_imsi_in_file, 1);
    }

    #[tokio::test]
    async fn test_adjacent_duplicates_are_not_skipped() {
        let store = MockStore::new(&[]);
        let data = file_data(
            5,
            vec![
                record("A", "1"),
                record("A", "2"),
                record("A", "3"),
                record("B", "4"),
                record("B", "5"),
            ],
        );

        let result = validate(data, &store).await.unwrap();

        assert_eq!(imsis(&result), vec!["A", "B"]);
        assert_eq!(result.validation.duplicate_imsi_in_file, 3);
        assert_eq!(result.records.len() + result.validation.duplicate_imsi_in_file, 5);
    }

    #[tokio::test]
    async fn test_existing_imsi_excluded_and_pass_continues() {
        let store = MockStore::new(&["B"]);
        let data = file_data(3, vec![record("A", "1"), record("B", "2"), record("C", "3")]);

        let result = validate(data, &store).await.unwrap();

        assert_eq!(imsis(&result), vec!["A", "C"]);
        assert_eq!(result.validation.already_existing_imsi, 1);
        assert_eq!(store.queried(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_not_queried_twice() {
        let store = MockStore::new(&["A"]);
        let data = file_data(2, vec![record("A", "1"), record("A", "2")]);

        let result = validate(data, &store).await.unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.validation.already_existing_imsi, 1);
        assert_eq!(result.validation.duplicate_imsi_in_file, 1);
        assert_eq!(store.queried(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_quantity_mismatch_fails_before_store_access() {
        let store = MockStore::new(&[]);
        let records = (0..9).map(|i| record(&i.to_string(), "1")).collect();
        let data = file_data(10, records);

        let err = validate(data, &store).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::QuantityMismatch {
                declared: 10,
                actual: 9
            }
        ));
        assert!(store.queried().is_empty());
    }

    #[tokio::test]
    async fn test_mismatch_is_checked_before_dedup() {
        // 宣告 3 筆、實際 3 筆（含重複）不算數量不符
        let store = MockStore::new(&[]);
        let data = file_data(3, vec![record("A", "1"), record("A", "2"), record("B", "3")]);

        assert!(validate(data, &store).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_validation() {
        let mut store = MockStore::new(&[]);
        store.fail_on = Some("B".to_string());
        let data = file_data(3, vec![record("A", "1"), record("B", "2"), record("C", "3")]);

        let err = validate(data, &store).await.unwrap_err();

        assert!(matches!(err, IngestError::Store { .. }));
        assert_eq!(store.queried(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_range_counter_is_carried_through() {
        let store = MockStore::new(&[]);
        let mut data = file_data(1, vec![record("A", "1")]);
        data.validation.invalid_imsi_range_count = 1;

        let result = validate(data, &store).await.unwrap();

        assert_eq!(result.validation.invalid_imsi_range_count, 1);
        assert_eq!(result.records.len(), 1);
    }
}
