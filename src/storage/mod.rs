// src/storage/mod.rs
use crate::extractors::OrganizationRecord;
use crate::filing::FilingPeriod;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

const RECORDS_FILE: &str = "organizations.json";
const METADATA_FILE: &str = "organizations_meta.json";

/// Anything that accepts a finished batch of records.
pub trait RecordSink {
    fn write_batch(&mut self, records: &[OrganizationRecord]) -> Result<(), StorageError>;
}

impl RecordSink for Vec<OrganizationRecord> {
    fn write_batch(&mut self, records: &[OrganizationRecord]) -> Result<(), StorageError> {
        self.extend_from_slice(records);
        Ok(())
    }
}

/// Writes record batches as JSON under `<base_dir>/<year>/<period code>/`.
pub struct StorageManager {
    base_dir: PathBuf,
    period: FilingPeriod,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P, period: FilingPeriod) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path, period })
    }

    pub fn target_dir(&self) -> PathBuf {
        self.base_dir
            .join(self.period.year.to_string())
            .join(&self.period.code)
    }

    /// Saves the records as a pretty-printed JSON array
    pub fn save_records(&self, records: &[OrganizationRecord]) -> Result<PathBuf, StorageError> {
        let target_dir = self.target_dir();
        fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;

        let file_path = target_dir.join(RECORDS_FILE);
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} records to {}", records.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the batch in JSON format
    pub fn save_metadata(&self, records: &[OrganizationRecord]) -> Result<PathBuf, StorageError> {
        let target_dir = self.target_dir();
        fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;

        let file_path = target_dir.join(METADATA_FILE);
        let metadata = serde_json::json!({
            "year": self.period.year,
            "period_code": self.period.code,
            "record_count": records.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}

impl RecordSink for StorageManager {
    fn write_batch(&mut self, records: &[OrganizationRecord]) -> Result<(), StorageError> {
        self.save_records(records)?;
        self.save_metadata(records)?;
        Ok(())
    }
}
