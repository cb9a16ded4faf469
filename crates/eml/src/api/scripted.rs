//! In-memory transport with canned responses
//!
//! Records every request it receives and answers from a per-endpoint
//! queue of scripted outcomes. Endpoints with nothing scripted answer
//! with a 404, the same way an endpoint the backend never shipped does.

use anyhow::Result;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::sync::{Arc, Mutex};

use super::multipart::MultipartBody;
use super::transport::{ApiRequest, Method, Transport};
use crate::error::{BackendError, HttpStatusError};
use crate::models::{UploadFile, UploadProgress};

/// Chunk size used when replaying an upload body
const UPLOAD_CHUNK: usize = 16 * 1024;

enum Payload {
    Json(Value),
    Bytes(Vec<u8>),
}

impl Payload {
    fn into_json(self) -> Result<Value> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Payload::Json(value) => Ok(serde_json::to_vec(&value)?),
            Payload::Bytes(bytes) => Ok(bytes),
        }
    }
}

enum Outcome {
    Reply(Payload),
    Backend { code: i64, msg: String },
    Status(u16),
}

/// A recorded upload call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub path: String,
    pub field: String,
    pub file_name: String,
    pub body_len: u64,
}

/// Called with each JSON request before it is answered
type SendHook = Arc<dyn Fn(&ApiRequest) + Send + Sync>;

#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<HashMap<(Method, String), VecDeque<Outcome>>>,
    requests: Mutex<Vec<ApiRequest>>,
    uploads: Mutex<Vec<RecordedUpload>>,
    on_send: Mutex<Option<SendHook>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, outcome: Outcome) {
        self.outcomes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
    }

    /// Answer the next `method path` call with `data` inside a success envelope
    pub fn respond(&self, method: Method, path: &str, data: Value) -> &Self {
        self.push(method, path, Outcome::Reply(Payload::Json(data)));
        self
    }

    /// Answer the next download of `path` with raw bytes
    pub fn respond_bytes(&self, method: Method, path: &str, bytes: Vec<u8>) -> &Self {
        self.push(method, path, Outcome::Reply(Payload::Bytes(bytes)));
        self
    }

    /// Answer the next call with a failed envelope
    pub fn fail(&self, method: Method, path: &str, code: i64, msg: &str) -> &Self {
        self.push(
            method,
            path,
            Outcome::Backend {
                code,
                msg: msg.to_string(),
            },
        );
        self
    }

    /// Answer the next call with a bare HTTP status
    pub fn fail_status(&self, method: Method, path: &str, status: u16) -> &Self {
        self.push(method, path, Outcome::Status(status));
        self
    }

    /// Run `hook` inside every later `send`, before its outcome is taken
    ///
    /// The hook may call back into the transport, e.g. through a store
    /// that shares it.
    pub fn on_send(&self, hook: impl Fn(&ApiRequest) + Send + Sync + 'static) {
        *self.on_send.lock().unwrap() = Some(Arc::new(hook));
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn next(&self, method: Method, path: &str) -> Result<Payload> {
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(|queue| queue.pop_front());

        match outcome {
            Some(Outcome::Backend { code, msg }) => Err(BackendError { code, msg }.into()),
            Some(Outcome::Status(status)) => Err(status_error(status, path)),
            Some(Outcome::Reply(payload)) => Ok(payload),
            None => Err(status_error(404, path)),
        }
    }
}

fn status_error(status: u16, path: &str) -> anyhow::Error {
    HttpStatusError {
        status,
        url: path.to_string(),
        body: String::new(),
    }
    .into()
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let hook = self.on_send.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(request);
        }
        self.next(request.method, &request.path)?.into_json()
    }

    fn download(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());
        self.next(request.method, &request.path)?.into_bytes()
    }

    fn upload(
        &self,
        path: &str,
        field: &str,
        file: &UploadFile,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<Value> {
        let body = MultipartBody::new(field, file);
        self.uploads.lock().unwrap().push(RecordedUpload {
            path: path.to_string(),
            field: field.to_string(),
            file_name: file.name.clone(),
            body_len: body.len(),
        });

        let payload = self.next(Method::Post, path)?;

        let mut reader = body.reader(on_progress);
        let mut chunk = vec![0u8; UPLOAD_CHUNK];
        while reader.read(&mut chunk)? > 0 {}

        payload.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_responses_are_consumed_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::Get, "/a", json!(1))
            .respond(Method::Get, "/a", json!(2));

        assert_eq!(transport.send(&ApiRequest::get("/a")).unwrap(), json!(1));
        assert_eq!(transport.send(&ApiRequest::get("/a")).unwrap(), json!(2));
        assert!(transport.send(&ApiRequest::get("/a")).is_err());
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn test_unscripted_endpoint_is_404() {
        let transport = ScriptedTransport::new();
        let err = transport.send(&ApiRequest::get("/missing")).unwrap_err();
        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert!(status.is_missing_endpoint());
    }

    #[test]
    fn test_backend_failure() {
        let transport = ScriptedTransport::new();
        transport.fail(Method::Put, "/x", 1_002_001, "not found");
        let err = transport.send(&ApiRequest::put("/x")).unwrap_err();
        let backend = err.downcast_ref::<BackendError>().unwrap();
        assert_eq!(backend.code, 1_002_001);
        assert_eq!(backend.msg, "not found");
    }

    #[test]
    fn test_send_hook_runs_before_outcome() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(Method::Get, "/outer", json!("outer"));
        transport.respond(Method::Get, "/inner", json!("inner"));

        let inner = Arc::downgrade(&transport);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        transport.on_send(move |request| {
            log.lock().unwrap().push(request.path.clone());
            if request.path == "/outer"
                && let Some(transport) = inner.upgrade()
            {
                transport.send(&ApiRequest::get("/inner")).unwrap();
            }
        });

        assert_eq!(transport.send(&ApiRequest::get("/outer")).unwrap(), json!("outer"));
        assert_eq!(*seen.lock().unwrap(), vec!["/outer", "/inner"]);
    }

    #[test]
    fn test_upload_replays_progress() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Post, "/up", json!(42));
        let file = UploadFile::new("a.zip", "application/zip", vec![0u8; 40_000]);

        let mut last = None;
        let result = transport
            .upload("/up", "file", &file, &mut |p| last = Some(p))
            .unwrap();

        assert_eq!(result, json!(42));
        let last = last.unwrap();
        assert_eq!(last.loaded, last.total);
        assert_eq!(transport.uploads()[0].body_len, last.total);
    }
}
