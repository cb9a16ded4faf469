//! Client configuration
//!
//! Loaded from (in order of priority):
//! 1. JSON file in the shared config directory (`eml-client.json`)
//! 2. Runtime environment variables
//! 3. Built-in defaults pointing at a local development backend

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config filename in the shared config directory
const CONFIG_FILE: &str = "eml-client.json";

pub const DEFAULT_BASE_URL: &str = "http://localhost:48080/admin-api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 500;

/// Connection settings for the archive backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Bearer token sent as `Authorization`
    pub access_token: Option<String>,
    /// Sent as the `tenant-id` header when set
    pub tenant_id: Option<String>,
    pub timeout_secs: u64,
    /// Timeout for ZIP uploads, which can take far longer than JSON calls
    pub upload_timeout_secs: u64,
    /// Largest archive accepted before an upload is attempted
    pub max_upload_mb: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            tenant_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl ClientConfig {
    /// Load configuration using the following priority:
    /// 1. JSON file (~/.config/eml-admin/eml-client.json)
    /// 2. Runtime environment variables
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if config::config_exists(CONFIG_FILE) {
            return config::load_json(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse client config JSON")
    }

    /// Build configuration from environment variables, defaulting the rest
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(url) = var("EML_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            cfg.base_url = url;
        }
        cfg.access_token = var("EML_ACCESS_TOKEN").filter(|v| !v.is_empty());
        cfg.tenant_id = var("EML_TENANT_ID").filter(|v| !v.is_empty());
        if let Some(secs) = var("EML_TIMEOUT_SECS") {
            cfg.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("EML_TIMEOUT_SECS is not a number: {}", secs))?;
        }

        Ok(cfg)
    }

    /// Persist this configuration to the shared config directory
    pub fn save(&self) -> Result<PathBuf> {
        config::save_json(CONFIG_FILE, self)
    }

    /// Path of the config file, whether or not it exists yet
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
