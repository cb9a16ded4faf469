//! Domain models mirrored from the archive backend

mod de;
mod email;
mod import;
mod page;
mod query;
mod stats;
mod upload;

pub use email::{EmailAttachment, EmailId, EmailMessage};
pub use import::{BatchId, ImportBatch, ImportErrorLog, ImportStatus, StatusTone};
pub use page::{ApiResult, PageResult};
pub use query::{
    DEFAULT_PAGE_SIZE, ERROR_LOG_PAGE_SIZE, EmailQueryParams, EmailQueryPatch,
    ImportBatchQueryParams, ImportBatchQueryPatch, ImportErrorQueryParams, ImportErrorQueryPatch,
    OrderDirection, Patch, QueryPairs,
};
pub use stats::{EmailStats, ImportStats};
pub use upload::{UploadFile, UploadProgress};
