//! Import batch, error log and upload state

use anyhow::Result;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;

use super::EmlStore;
use crate::error::UploadRejected;
use crate::models::{
    BatchId, ImportBatch, ImportBatchQueryParams, ImportBatchQueryPatch, ImportErrorLog,
    ImportErrorQueryParams, ImportErrorQueryPatch, ImportStats, PageResult, UploadFile,
};
use crate::utils::validate_upload;

/// Everything the import views read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportState {
    pub batches: Vec<ImportBatch>,
    pub total: u64,
    pub loading: bool,
    pub current_batch: Option<ImportBatch>,
    pub error_logs: Vec<ImportErrorLog>,
    pub error_log_total: u64,
    pub error_log_loading: bool,
    pub query: ImportBatchQueryParams,
    /// Percentage of the upload body sent, 0 while idle
    pub upload_progress: u8,
    pub uploading: bool,
}

impl Default for ImportState {
    fn default() -> Self {
        Self {
            batches: Vec::new(),
            total: 0,
            loading: false,
            current_batch: None,
            error_logs: Vec::new(),
            error_log_total: 0,
            error_log_loading: false,
            query: ImportBatchQueryParams::first_page(),
            upload_progress: 0,
            uploading: false,
        }
    }
}

impl ImportState {
    pub fn stats(&self) -> ImportStats {
        ImportStats::from_page(self.total, &self.batches)
    }
}

impl EmlStore {
    /// Load a page of import batches, merging `patch` into the stored query
    pub fn fetch_import_batch_list(
        &self,
        patch: Option<ImportBatchQueryPatch>,
    ) -> Result<PageResult<ImportBatch>> {
        let (mut query, ticket) = {
            let mut state = self.import_write();
            if let Some(patch) = patch {
                state.query.merge(patch);
            }
            state.query.split_create_time_range();
            state.loading = true;
            (state.query.clone(), self.batch_list_seq.issue())
        };

        let result = self.import_api.get_import_batch_page(&mut query);

        let mut state = self.import_write();
        let current = self.batch_list_seq.is_current(ticket);
        if current {
            state.loading = false;
        }
        match result {
            Ok(page) => {
                if current {
                    state.batches = page.list.clone();
                    state.total = page.total;
                } else {
                    debug!("Dropping batch page from superseded request {}", ticket);
                }
                Ok(page)
            }
            Err(e) => {
                error!("Failed to fetch import batches: {:#}", e);
                Err(e)
            }
        }
    }

    /// Load a batch's error log
    ///
    /// Starts from page 1 with 100 rows; `patch` overrides either. The
    /// query is not kept between calls.
    pub fn fetch_import_error_logs(
        &self,
        batch_id: BatchId,
        patch: Option<ImportErrorQueryPatch>,
    ) -> Result<PageResult<ImportErrorLog>> {
        let mut params = ImportErrorQueryParams::for_batch(batch_id);
        if let Some(patch) = patch {
            params.merge(patch);
        }

        let ticket = {
            let mut state = self.import_write();
            state.error_log_loading = true;
            self.error_log_seq.issue()
        };

        let result = self.import_api.get_import_error_logs(&params);

        let mut state = self.import_write();
        let current = self.error_log_seq.is_current(ticket);
        if current {
            state.error_log_loading = false;
        }
        match result {
            Ok(page) => {
                if current {
                    state.error_logs = page.list.clone();
                    state.error_log_total = page.total;
                }
                Ok(page)
            }
            Err(e) => {
                error!("Failed to fetch error logs for batch {}: {:#}", batch_id, e);
                Err(e)
            }
        }
    }

    /// Upload a ZIP archive, tracking progress, then refresh the batch list
    ///
    /// The file is checked with [`validate_upload`] first and rejected with
    /// [`UploadRejected`] without contacting the backend. `on_progress`
    /// receives whole percentages for events with a known total, after
    /// `upload_progress` has been updated. Returns the upload endpoint's
    /// data, normally the new batch id. A failed refresh fails the call
    /// even though the upload went through.
    pub fn upload_zip_file_with_progress(
        &self,
        file: &UploadFile,
        on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<Value> {
        let validation = validate_upload(file, Some(self.max_upload_mb));
        if !validation.valid {
            let message = validation.message.unwrap_or_default();
            error!("Rejected upload of {}: {}", file.name, message);
            return Err(UploadRejected { message }.into());
        }

        let ticket = {
            let mut state = self.import_write();
            state.uploading = true;
            state.upload_progress = 0;
            self.upload_seq.issue()
        };

        let result = self.upload_and_refresh(file, ticket, on_progress);

        {
            let mut state = self.import_write();
            if self.upload_seq.is_current(ticket) {
                state.uploading = false;
                state.upload_progress = 0;
            }
        }

        result.inspect_err(|e| error!("Failed to upload {}: {:#}", file.name, e))
    }

    fn upload_and_refresh(
        &self,
        file: &UploadFile,
        ticket: u64,
        mut on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<Value> {
        let data = self.import_api.upload_zip_file(file, &mut |event| {
            if let Some(percent) = event.percent() {
                if self.upload_seq.is_current(ticket) {
                    self.import_write().upload_progress = percent;
                }
                if let Some(callback) = on_progress.as_mut() {
                    callback(percent);
                }
            }
        })?;

        info!("Uploaded {}, refreshing import batches", file.name);
        self.fetch_import_batch_list(None)?;
        Ok(data)
    }

    pub fn set_current_batch(&self, batch: ImportBatch) {
        self.import_write().current_batch = Some(batch);
    }

    pub fn is_import_loading(&self) -> bool {
        self.import_read().loading
    }

    pub fn is_error_log_loading(&self) -> bool {
        self.import_read().error_log_loading
    }

    pub fn is_uploading(&self) -> bool {
        self.import_read().uploading
    }

    /// Percentage of the current upload sent, 0 while idle
    pub fn upload_progress(&self) -> u8 {
        self.import_read().upload_progress
    }

    pub fn import_stats(&self) -> ImportStats {
        self.import_read().stats()
    }

    /// Restore defaults; responses to requests already in flight are dropped
    pub fn reset_import_state(&self) {
        let mut state = self.import_write();
        self.batch_list_seq.issue();
        self.error_log_seq.issue();
        self.upload_seq.issue();
        *state = ImportState::default();
    }
}
