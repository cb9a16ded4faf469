//! Upload checks and saving downloaded files

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_MAX_UPLOAD_MB;
use crate::models::UploadFile;

const ZIP_CONTENT_TYPES: [&str; 2] = ["application/zip", "application/x-zip-compressed"];

/// Outcome of a pre-upload check; `message` is set when `valid` is false
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidation {
    pub valid: bool,
    pub message: Option<String>,
}

impl FileValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Lowercased text after the last `.`
///
/// Empty when there is no dot or the name starts with its only dot
/// (`.hidden`).
pub fn get_file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => name[dot + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Whether a file looks like a ZIP archive by extension or MIME type
pub fn is_zip_file(name: &str, content_type: &str) -> bool {
    get_file_extension(name) == "zip" || ZIP_CONTENT_TYPES.contains(&content_type)
}

/// Check a size against a limit in megabytes (`max_mb * 1024 * 1024` bytes)
pub fn validate_file_size(size_bytes: u64, max_mb: u64) -> FileValidation {
    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if size_bytes > max_bytes {
        return FileValidation::invalid(format!("File size must not exceed {}MB", max_mb));
    }
    FileValidation::ok()
}

/// Check that `file` is a ZIP archive within the size limit
///
/// `max_mb` defaults to [`DEFAULT_MAX_UPLOAD_MB`] when `None`.
pub fn validate_upload(file: &UploadFile, max_mb: Option<u64>) -> FileValidation {
    if !is_zip_file(&file.name, &file.content_type) {
        return FileValidation::invalid("Only .zip archives can be imported");
    }
    validate_file_size(file.size(), max_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB))
}

/// File name with any directory components and separators removed
fn safe_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => "download".to_string(),
        _ => base.to_string(),
    }
}

/// Write downloaded bytes to `dir` under the given file name
///
/// Only the last path component of `filename` is used. Existing files
/// are overwritten.
pub fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory: {}", dir.display()))?;
    let path = dir.join(safe_file_name(filename));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write download: {}", path.display()))?;
    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
