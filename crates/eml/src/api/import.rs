//! Archive import endpoints (`/system/email-import`)

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use super::transport::{ApiRequest, Transport};
use crate::models::{
    BatchId, ImportBatch, ImportBatchQueryParams, ImportErrorLog, ImportErrorQueryParams,
    PageResult, UploadFile, UploadProgress,
};

/// Multipart field the upload endpoint reads the archive from
const UPLOAD_FIELD: &str = "file";

/// Stateless client for the import endpoints
///
/// Import jobs run on the backend; these calls only start them, poll
/// them, or send one-shot control commands.
#[derive(Clone)]
pub struct ImportApi {
    transport: Arc<dyn Transport>,
}

impl ImportApi {
    const BASE: &'static str = "/system/email-import";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", Self::BASE, suffix)
    }

    fn batch_path(id: BatchId, action: Option<&str>) -> String {
        match action {
            Some(action) => Self::path(&format!("/import-batch/{}/{}", id, action)),
            None => Self::path(&format!("/import-batch/{}", id)),
        }
    }

    /// Upload a ZIP of `.eml` files, starting a new import batch
    ///
    /// The archive content is not inspected. `on_progress` receives
    /// `{loaded, total}` byte counts while the body is sent.
    pub fn upload_zip_file(
        &self,
        file: &UploadFile,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<Value> {
        self.transport
            .upload(&Self::path("/upload-zip"), UPLOAD_FIELD, file, on_progress)
    }

    /// Fetch one page of import batches
    ///
    /// A two-element `create_time_range` is moved into
    /// `create_time_start`/`create_time_end` on `params` itself.
    pub fn get_import_batch_page(
        &self,
        params: &mut ImportBatchQueryParams,
    ) -> Result<PageResult<ImportBatch>> {
        params.split_create_time_range();
        let request = ApiRequest::get(Self::path("/import/batches")).query(params.to_query_pairs());
        decode(self.transport.send(&request)?, "import batch page")
    }

    pub fn get_import_batch(&self, id: BatchId) -> Result<ImportBatch> {
        let request = ApiRequest::get(Self::batch_path(id, None));
        decode(self.transport.send(&request)?, "import batch")
    }

    /// Fetch a batch's error log
    ///
    /// The batch id goes into both the path and the query string; the
    /// backend is responsible for checking they agree.
    pub fn get_import_error_logs(
        &self,
        params: &ImportErrorQueryParams,
    ) -> Result<PageResult<ImportErrorLog>> {
        let request = ApiRequest::get(Self::path(&format!("/import/errors/{}", params.batch_id)))
            .query(params.to_query_pairs());
        decode(self.transport.send(&request)?, "import error log page")
    }

    pub fn delete_import_batch(&self, id: BatchId) -> Result<Value> {
        self.transport
            .send(&ApiRequest::delete(Self::batch_path(id, None)))
    }

    pub fn delete_import_batches(&self, ids: &[BatchId]) -> Result<Value> {
        let request =
            ApiRequest::delete(Self::path("/import-batches/batch")).json(serde_json::to_value(ids)?);
        self.transport.send(&request)
    }

    /// Re-run the files that failed in a batch
    pub fn retry_import_batch(&self, id: BatchId) -> Result<Value> {
        self.transport
            .send(&ApiRequest::post(Self::batch_path(id, Some("retry"))))
    }

    pub fn get_import_progress(&self, id: BatchId) -> Result<Value> {
        let request = ApiRequest::get(Self::path(&format!("/import-progress/{}", id)));
        self.transport.send(&request)
    }

    /// Ask the backend to stop a running batch
    ///
    /// Affects the server-side job only, never an upload in flight.
    pub fn cancel_import(&self, id: BatchId) -> Result<Value> {
        self.transport
            .send(&ApiRequest::post(Self::batch_path(id, Some("cancel"))))
    }

    /// Download a batch's processing log
    pub fn export_import_log(&self, id: BatchId) -> Result<Vec<u8>> {
        self.transport
            .download(&ApiRequest::get(Self::batch_path(id, Some("export-log"))))
    }

    pub fn get_import_statistics(&self) -> Result<Value> {
        self.transport
            .send(&ApiRequest::get(Self::path("/import-statistics")))
    }

    /// Remove a batch's temporary files on the backend
    pub fn cleanup_import_files(&self, id: BatchId) -> Result<Value> {
        self.transport
            .send(&ApiRequest::post(Self::batch_path(id, Some("cleanup"))))
    }
}
