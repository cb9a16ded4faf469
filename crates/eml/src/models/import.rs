//! Import batch models
//!
//! A batch is one server-side job processing one uploaded ZIP of `.eml`
//! files. All state transitions happen on the backend; the client only
//! polls and displays.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::de::{null_as_default, opt_string_or_number};

/// Backend primary key of an import batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub i64);

impl BatchId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for BatchId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Import batch status, sent over the wire as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ImportStatus {
    Processing,
    Completed,
    PartialSuccess,
    Failed,
    /// A code this client does not know about
    Unknown(i64),
}

/// Visual tone used when rendering a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Warning,
    Danger,
}

impl StatusTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTone::Info => "info",
            StatusTone::Success => "success",
            StatusTone::Warning => "warning",
            StatusTone::Danger => "danger",
        }
    }
}

impl ImportStatus {
    pub const PROCESSING: i64 = 1;
    pub const COMPLETED: i64 = 2;
    pub const PARTIAL_SUCCESS: i64 = 3;
    pub const FAILED: i64 = 4;

    pub fn code(&self) -> i64 {
        match self {
            ImportStatus::Processing => Self::PROCESSING,
            ImportStatus::Completed => Self::COMPLETED,
            ImportStatus::PartialSuccess => Self::PARTIAL_SUCCESS,
            ImportStatus::Failed => Self::FAILED,
            ImportStatus::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportStatus::Processing => "Processing",
            ImportStatus::Completed => "Completed",
            ImportStatus::PartialSuccess => "Partial success",
            ImportStatus::Failed => "Failed",
            ImportStatus::Unknown(_) => "Unknown",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            ImportStatus::Processing => StatusTone::Info,
            ImportStatus::Completed => StatusTone::Success,
            ImportStatus::PartialSuccess => StatusTone::Warning,
            ImportStatus::Failed => StatusTone::Danger,
            ImportStatus::Unknown(_) => StatusTone::Info,
        }
    }

    /// Whether the backend job has finished, successfully or not
    ///
    /// Unknown codes are not terminal, so a poller keeps asking.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ImportStatus::Completed | ImportStatus::PartialSuccess | ImportStatus::Failed
        )
    }
}

impl From<i64> for ImportStatus {
    fn from(code: i64) -> Self {
        match code {
            Self::PROCESSING => ImportStatus::Processing,
            Self::COMPLETED => ImportStatus::Completed,
            Self::PARTIAL_SUCCESS => ImportStatus::PartialSuccess,
            Self::FAILED => ImportStatus::Failed,
            other => ImportStatus::Unknown(other),
        }
    }
}

impl From<ImportStatus> for i64 {
    fn from(status: ImportStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One import job as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub id: BatchId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batch_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    pub status: ImportStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_files: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub success_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fail_count: u32,
    /// Alias of `fail_count` used by some endpoints
    #[serde(default)]
    pub failure_count: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub create_time: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub complete_time: Option<String>,
    /// Seconds spent processing
    #[serde(default)]
    pub processing_time: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ImportBatch {
    pub fn new(id: impl Into<BatchId>, status: ImportStatus) -> Self {
        Self {
            id: id.into(),
            batch_name: String::new(),
            zip_filename: String::new(),
            user_id: 0,
            user_name: None,
            status,
            total_files: 0,
            success_count: 0,
            fail_count: 0,
            failure_count: None,
            create_time: None,
            complete_time: None,
            processing_time: None,
            error_message: None,
        }
    }

    /// Failed file count, whichever field the backend filled in
    pub fn failed(&self) -> u32 {
        if self.fail_count > 0 {
            self.fail_count
        } else {
            self.failure_count.unwrap_or(0)
        }
    }
}

/// A per-file failure recorded while processing a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorLog {
    pub id: i64,
    pub batch_id: BatchId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_message: String,
    #[serde(default)]
    pub error_stack: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub create_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire_codes() {
        assert_eq!(ImportStatus::from(1), ImportStatus::Processing);
        assert_eq!(ImportStatus::from(2), ImportStatus::Completed);
        assert_eq!(ImportStatus::from(3), ImportStatus::PartialSuccess);
        assert_eq!(ImportStatus::from(4), ImportStatus::Failed);
        assert_eq!(ImportStatus::from(9), ImportStatus::Unknown(9));
    }

    #[test]
    fn test_status_serializes_as_integer() {
        let json = serde_json::to_string(&ImportStatus::PartialSuccess).unwrap();
        assert_eq!(json, "3");
        let status: ImportStatus = serde_json::from_str("4").unwrap();
        assert_eq!(status, ImportStatus::Failed);
    }

    #[test]
    fn test_status_labels_and_tones() {
        assert_eq!(ImportStatus::Completed.label(), "Completed");
        assert_eq!(ImportStatus::Failed.tone(), StatusTone::Danger);
        assert_eq!(ImportStatus::Unknown(0).label(), "Unknown");
        assert_eq!(ImportStatus::Unknown(0).tone().as_str(), "info");
        assert!(!ImportStatus::Processing.is_terminal());
        assert!(ImportStatus::PartialSuccess.is_terminal());
        assert!(ImportStatus::Failed.is_terminal());
        assert!(!ImportStatus::Unknown(7).is_terminal());
    }

    #[test]
    fn test_deserialize_null_counts_and_names() {
        let json = r#"{
            "id": 5,
            "batchName": null,
            "zipFilename": null,
            "userId": null,
            "status": 1,
            "totalFiles": null,
            "successCount": null,
            "failCount": null
        }"#;
        let batch: ImportBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.batch_name, "");
        assert_eq!(batch.total_files, 0);
        assert_eq!(batch.failed(), 0);

        let json = r#"{"id": 1, "batchId": 5, "filePath": null, "errorType": null, "errorMessage": null}"#;
        let log: ImportErrorLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.batch_id, BatchId(5));
        assert!(log.file_path.is_empty());
        assert!(log.error_message.is_empty());
    }

    #[test]
    fn test_deserialize_batch_with_failure_alias() {
        let json = r#"{
            "id": 12,
            "batchName": "March archive",
            "zipFilename": "march.zip",
            "userId": 1,
            "status": 3,
            "totalFiles": 10,
            "successCount": 8,
            "failureCount": 2,
            "createTime": "2024-03-01 10:00:00",
            "processingTime": 95
        }"#;

        let batch: ImportBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.id, BatchId(12));
        assert_eq!(batch.status, ImportStatus::PartialSuccess);
        assert_eq!(batch.failed(), 2);
        assert_eq!(batch.processing_time, Some(95));
    }
}
