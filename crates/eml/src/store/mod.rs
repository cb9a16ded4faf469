//! UI-facing state for the archive admin views
//!
//! `EmlStore` binds the REST clients to plain state a view can read:
//! - email list, detail, attachments and selection (`EmailState`)
//! - import batches, error logs and upload progress (`ImportState`)
//!
//! The store is meant to be shared as `Arc<EmlStore>`. Actions take `&self`
//! and never hold a state lock across a backend call, so another thread
//! can read `loading`, `uploading` or `upload_progress` while a request is
//! in flight. Actions call the backend first and only touch local state
//! once the call succeeded. Failures are logged and returned as is.
//!
//! Overlapping calls of the same kind are ordered by issue: a response
//! that arrives after a newer call of its kind was started is returned to
//! its caller but not written into state.

mod email;
mod import;

pub use email::{EmailState, reconcile_deletion, reconcile_star_toggle};
pub use import::ImportState;

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{EmailApi, HttpTransport, ImportApi, Transport};
use crate::config::{ClientConfig, DEFAULT_MAX_UPLOAD_MB};

/// Hands out increasing tickets for one kind of request
///
/// Only the holder of the newest ticket writes its result into state.
#[derive(Debug, Default)]
struct RequestSeq(AtomicU64);

impl RequestSeq {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

pub struct EmlStore {
    email: RwLock<EmailState>,
    import: RwLock<ImportState>,
    email_api: EmailApi,
    import_api: ImportApi,
    max_upload_mb: u64,
    email_list_seq: RequestSeq,
    email_detail_seq: RequestSeq,
    batch_list_seq: RequestSeq,
    error_log_seq: RequestSeq,
    upload_seq: RequestSeq,
}

impl EmlStore {
    /// Create a store with empty state over `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            email: RwLock::new(EmailState::default()),
            import: RwLock::new(ImportState::default()),
            email_api: EmailApi::new(transport.clone()),
            import_api: ImportApi::new(transport),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            email_list_seq: RequestSeq::default(),
            email_detail_seq: RequestSeq::default(),
            batch_list_seq: RequestSeq::default(),
            error_log_seq: RequestSeq::default(),
            upload_seq: RequestSeq::default(),
        }
    }

    /// Create a store talking to the backend described by `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)).with_max_upload_mb(config.max_upload_mb))
    }

    pub fn with_max_upload_mb(mut self, max_upload_mb: u64) -> Self {
        self.max_upload_mb = max_upload_mb;
        self
    }

    /// Client for the email calls the store does not wrap
    pub fn email_api(&self) -> &EmailApi {
        &self.email_api
    }

    /// Client for the import calls the store does not wrap
    pub fn import_api(&self) -> &ImportApi {
        &self.import_api
    }

    /// Snapshot of the email state
    pub fn email_state(&self) -> EmailState {
        self.email_read().clone()
    }

    /// Snapshot of the import state
    pub fn import_state(&self) -> ImportState {
        self.import_read().clone()
    }

    // Poisoned locks are read through; state holds plain data only.
    fn email_read(&self) -> RwLockReadGuard<'_, EmailState> {
        self.email.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn email_write(&self) -> RwLockWriteGuard<'_, EmailState> {
        self.email.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn import_read(&self) -> RwLockReadGuard<'_, ImportState> {
        self.import.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn import_write(&self) -> RwLockWriteGuard<'_, ImportState> {
        self.import.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset_all_state(&self) {
        self.reset_email_state();
        self.reset_import_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_seq_only_newest_is_current() {
        let seq = RequestSeq::default();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
