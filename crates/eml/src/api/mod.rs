//! REST clients for the archive backend
//!
//! This module provides:
//! - The `Transport` seam and its ureq-backed implementation
//! - A scripted in-memory transport for tests and offline use
//! - `EmailApi` and `ImportApi`, one method per backend endpoint

mod email;
mod http;
mod import;
mod multipart;
mod scripted;
mod transport;

pub use email::EmailApi;
pub use http::HttpTransport;
pub use import::ImportApi;
pub use multipart::{MultipartBody, ProgressReader};
pub use scripted::{RecordedUpload, ScriptedTransport};
pub use transport::{ApiRequest, Method, Transport};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode an envelope's `data` into a typed model
fn decode<T: DeserializeOwned>(data: Value, what: &str) -> Result<T> {
    serde_json::from_value(data).with_context(|| format!("Failed to parse {} response", what))
}
