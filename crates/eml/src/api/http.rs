//! Blocking HTTP transport backed by ureq
//!
//! Uses synchronous HTTP to stay executor-agnostic. Status codes are
//! checked here rather than by ureq so that error bodies can be kept.

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::io::Read;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder, SendBody};
use url::Url;

use super::multipart::MultipartBody;
use super::transport::{ApiRequest, Method, Transport};
use crate::config::ClientConfig;
use crate::error::{BackendError, HttpStatusError};
use crate::models::{ApiResult, UploadFile, UploadProgress};

/// Transport talking to the real backend
pub struct HttpTransport {
    agent: Agent,
    upload_agent: Agent,
    base_url: String,
    access_token: Option<String>,
    tenant_id: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL: {}", config.base_url))?;

        Ok(Self {
            agent: build_agent(config.timeout_secs),
            upload_agent: build_agent(config.upload_timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Resolve an endpoint path and query against the base URL
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .with_context(|| format!("Invalid endpoint path: {}", path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorize<B>(&self, builder: RequestBuilder<B>) -> RequestBuilder<B> {
        let mut builder = builder.header("Accept", "application/json");
        if let Some(token) = &self.access_token {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(tenant) = &self.tenant_id {
            builder = builder.header("tenant-id", tenant);
        }
        builder
    }

    fn execute(&self, request: &ApiRequest) -> Result<(Url, Response<Body>)> {
        let url = self.build_url(&request.path, &request.query)?;
        debug!("{} {}", request.method, url);

        let agent = &self.agent;
        let result = match request.method {
            Method::Get => self.authorize(agent.get(url.as_str())).call(),
            Method::Delete => {
                let builder = self.authorize(agent.delete(url.as_str()));
                match &request.body {
                    Some(body) => builder.force_send_body().send_json(body),
                    None => builder.call(),
                }
            }
            Method::Post | Method::Put => {
                let builder = if request.method == Method::Post {
                    agent.post(url.as_str())
                } else {
                    agent.put(url.as_str())
                };
                let builder = self.authorize(builder);
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        };

        let response = result
            .with_context(|| format!("Failed to send {} {}", request.method, request.path))?;
        Ok((url, response))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        let (url, response) = self.execute(request)?;
        read_envelope(&url, response)
    }

    fn download(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        let (url, mut response) = self.execute(request)?;
        let response_is_json = is_json(&response);
        check_status(&url, &mut response)?;

        let mut bytes = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read download from {}", url))?;

        // Failed downloads come back as a JSON envelope with a 200 status
        if response_is_json
            && let Ok(envelope) = serde_json::from_slice::<ApiResult<Value>>(&bytes)
            && !envelope.is_success()
        {
            return Err(BackendError {
                code: envelope.code,
                msg: envelope.message().to_string(),
            }
            .into());
        }

        info!("Downloaded {} bytes from {}", bytes.len(), request.path);
        Ok(bytes)
    }

    fn upload(
        &self,
        path: &str,
        field: &str,
        file: &UploadFile,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<Value> {
        let url = self.build_url(path, &[])?;
        let body = MultipartBody::new(field, file);
        info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.size(),
            path
        );

        let mut request = self.authorize(self.upload_agent.post(url.as_str()));
        for (name, value) in body.headers() {
            request = request.header(name, value);
        }
        let mut reader = body.reader(on_progress);
        let response = request
            .send(SendBody::from_reader(&mut reader))
            .with_context(|| format!("Failed to upload {}", file.name))?;

        read_envelope(&url, response)
    }
}

fn build_agent(timeout_secs: u64) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build();
    Agent::new_with_config(config)
}

fn is_json(response: &Response<Body>) -> bool {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn check_status(url: &Url, response: &mut Response<Body>) -> Result<()> {
    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        return Ok(());
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(HttpStatusError {
        status,
        url: url.to_string(),
        body,
    }
    .into())
}

fn read_envelope(url: &Url, mut response: Response<Body>) -> Result<Value> {
    check_status(url, &mut response)?;

    let envelope: ApiResult<Value> = response
        .body_mut()
        .read_json()
        .with_context(|| format!("Failed to parse response from {}", url.path()))?;

    if !envelope.is_success() {
        return Err(BackendError {
            code: envelope.code,
            msg: envelope.message().to_string(),
        }
        .into());
    }

    Ok(envelope.data.unwrap_or(Value::Null))
}
