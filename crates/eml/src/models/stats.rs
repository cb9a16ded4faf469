//! Aggregates derived from the loaded pages

use serde::Serialize;

use super::{EmailMessage, ImportBatch, ImportStatus};

/// Email counters shown above the list
///
/// `total` is the backend's total; the other counts cover the loaded
/// page only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total: u64,
    pub starred: u64,
    pub with_attachments: u64,
}

impl EmailStats {
    pub fn from_page(total: u64, emails: &[EmailMessage]) -> Self {
        Self {
            total,
            starred: emails.iter().filter(|e| e.is_starred).count() as u64,
            with_attachments: emails.iter().filter(|e| e.has_attachments()).count() as u64,
        }
    }
}

/// Import batch counters, computed like [`EmailStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
    pub processing: u64,
}

impl ImportStats {
    pub fn from_page(total: u64, batches: &[ImportBatch]) -> Self {
        let count = |status: ImportStatus| batches.iter().filter(|b| b.status == status).count() as u64;
        Self {
            total,
            completed: count(ImportStatus::Completed),
            failed: count(ImportStatus::Failed),
            processing: count(ImportStatus::Processing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailId;

    #[test]
    fn test_email_stats_use_backend_total() {
        let mut starred = EmailMessage::new(EmailId(1));
        starred.is_starred = true;
        starred.attachment_count = 2;
        let plain = EmailMessage::new(EmailId(2));

        let stats = EmailStats::from_page(40, &[starred, plain]);
        assert_eq!(
            stats,
            EmailStats {
                total: 40,
                starred: 1,
                with_attachments: 1
            }
        );
    }

    #[test]
    fn test_import_stats_ignore_partial_and_unknown() {
        let batches = [
            ImportBatch::new(1, ImportStatus::Completed),
            ImportBatch::new(2, ImportStatus::PartialSuccess),
            ImportBatch::new(3, ImportStatus::Failed),
            ImportBatch::new(4, ImportStatus::Processing),
            ImportBatch::new(5, ImportStatus::Unknown(9)),
        ];

        let stats = ImportStats::from_page(5, &batches);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.total, 5);
    }
}
