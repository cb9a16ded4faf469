//! Transport trait: the single seam between the REST clients and HTTP

use anyhow::Result;
use serde_json::Value;
use std::fmt;

use crate::models::{QueryPairs, UploadFile, UploadProgress};

/// HTTP verbs used by the archive endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A backend call described independently of any HTTP library
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/system/email/page`
    pub path: String,
    pub query: QueryPairs,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryPairs::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, pairs: QueryPairs) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first query parameter named `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Carries requests to the backend and unwraps its response envelope
///
/// Implementations return the envelope's `data` field (`Value::Null` when
/// absent) and turn every failure into an error: transport problems,
/// non-2xx statuses ([`crate::error::HttpStatusError`]) and failed envelopes
/// ([`crate::error::BackendError`]). No retries happen at this level.
pub trait Transport: Send + Sync {
    /// Send a JSON request
    fn send(&self, request: &ApiRequest) -> Result<Value>;

    /// Send a request whose response body is a file
    fn download(&self, request: &ApiRequest) -> Result<Vec<u8>>;

    /// POST `file` as a single-part multipart form under `field`
    ///
    /// `on_progress` is called as body bytes are handed to the connection.
    fn upload(
        &self,
        path: &str,
        field: &str,
        file: &UploadFile,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<Value>;
}
