//! Typed failures raised by the REST layer
//!
//! Everything travels as `anyhow::Error`; callers that need to branch on
//! the failure kind can `downcast_ref` to one of these.

/// The backend answered with a non-2xx HTTP status
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status} from {url}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// The backend answered 2xx but its envelope reported a failure
#[derive(Debug, thiserror::Error)]
#[error("Backend error {code}: {msg}")]
pub struct BackendError {
    pub code: i64,
    pub msg: String,
}

impl HttpStatusError {
    /// 404 and 405 are what an endpoint the backend never shipped returns
    pub fn is_missing_endpoint(&self) -> bool {
        matches!(self.status, 404 | 405)
    }
}

/// An upload was refused locally before any bytes were sent
#[derive(Debug, thiserror::Error)]
#[error("Upload rejected: {message}")]
pub struct UploadRejected {
    pub message: String,
}
