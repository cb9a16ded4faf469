//! Single-file multipart/form-data encoding with progress reporting

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::io::Read;

use crate::models::{UploadFile, UploadProgress};

/// An encoded multipart body holding exactly one file part
pub struct MultipartBody<'a> {
    boundary: String,
    head: Vec<u8>,
    file: &'a [u8],
    tail: Vec<u8>,
}

impl<'a> MultipartBody<'a> {
    pub fn new(field: &str, file: &'a UploadFile) -> Self {
        Self::with_boundary(field, file, random_boundary())
    }

    pub fn with_boundary(field: &str, file: &'a UploadFile, boundary: String) -> Self {
        let content_type = if file.content_type.is_empty() {
            "application/octet-stream"
        } else {
            file.content_type.as_str()
        };
        let head = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {content_type}\r\n\r\n",
            escape_quoted(field),
            escape_quoted(&file.name),
        )
        .into_bytes();
        let tail = format!("\r\n--{boundary}--\r\n").into_bytes();

        Self {
            boundary,
            head,
            file: &file.bytes,
            tail,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Total encoded length in bytes
    pub fn len(&self) -> u64 {
        (self.head.len() + self.file.len() + self.tail.len()) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Content-Type` and `Content-Length` for the request
    ///
    /// The length is known up front, so the body never needs chunked
    /// transfer encoding.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Content-Type", self.content_type()),
            ("Content-Length", self.len().to_string()),
        ]
    }

    /// A reader over the encoded body that reports every chunk it yields
    pub fn reader<'b>(
        &'b self,
        on_progress: &'b mut dyn FnMut(UploadProgress),
    ) -> ProgressReader<'b> {
        ProgressReader {
            parts: [self.head.as_slice(), self.file, self.tail.as_slice()],
            part: 0,
            offset: 0,
            loaded: 0,
            total: self.len(),
            on_progress,
        }
    }

    /// The full body as one buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() as usize);
        out.extend_from_slice(&self.head);
        out.extend_from_slice(self.file);
        out.extend_from_slice(&self.tail);
        out
    }
}

/// Streams an encoded multipart body, emitting `{loaded, total}` events
pub struct ProgressReader<'a> {
    parts: [&'a [u8]; 3],
    part: usize,
    offset: usize,
    loaded: u64,
    total: u64,
    on_progress: &'a mut dyn FnMut(UploadProgress),
}

impl Read for ProgressReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.part < self.parts.len() && self.offset >= self.parts[self.part].len() {
            self.part += 1;
            self.offset = 0;
        }
        if self.part >= self.parts.len() || buf.is_empty() {
            return Ok(0);
        }

        let current = &self.parts[self.part][self.offset..];
        let n = current.len().min(buf.len());
        buf[..n].copy_from_slice(&current[..n]);
        self.offset += n;
        self.loaded += n as u64;

        (self.on_progress)(UploadProgress {
            loaded: self.loaded,
            total: self.total,
        });

        Ok(n)
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { "%22".to_string() } else { c.to_string() })
        .collect()
}

fn random_boundary() -> String {
    let hasher = RandomState::new().build_hasher();
    format!("----EmlFormBoundary{:016x}", hasher.finish())
}
