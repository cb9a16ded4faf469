//! Eml crate - Client data layer for the email archive admin console
//!
//! This crate provides:
//! - Domain models for archived emails and import batches
//! - Blocking REST clients for the email and import endpoints
//! - A shareable state store binding those calls to state views can read
//! - Formatting, address parsing, HTML and path-tree helpers
//!
//! It has no UI dependencies. The backend is reached through the
//! `Transport` trait, so the store can be driven by `ScriptedTransport`
//! in tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiRequest, EmailApi, HttpTransport, ImportApi, Method, ScriptedTransport, Transport};
pub use config::ClientConfig;
pub use error::{BackendError, HttpStatusError, UploadRejected};
pub use models::{
    ApiResult, BatchId, EmailAttachment, EmailId, EmailMessage, EmailQueryParams, EmailQueryPatch,
    EmailStats, ImportBatch, ImportBatchQueryParams, ImportBatchQueryPatch, ImportErrorLog,
    ImportErrorQueryParams, ImportErrorQueryPatch, ImportStats, ImportStatus, PageResult,
    Patch, StatusTone, UploadFile, UploadProgress,
};
pub use store::{EmailState, EmlStore, ImportState, reconcile_deletion, reconcile_star_toggle};
