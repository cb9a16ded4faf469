//! Upload payload and progress types

use anyhow::{Context, Result};
use std::path::Path;

use crate::utils::file::get_file_extension;

/// A byte-level progress event emitted while a request body is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Whole-number percentage, or `None` while the total is unknown
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.loaded as f64 * 100.0 / self.total as f64).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

/// A file held in memory, ready to be sent as a multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read upload file: {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Upload path has no file name")?
            .to_string();
        let content_type = guess_content_type(&name).to_string();

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn guess_content_type(name: &str) -> &'static str {
    match get_file_extension(name).as_str() {
        "zip" => "application/zip",
        "eml" => "message/rfc822",
        _ => "application/octet-stream",
    }
}
