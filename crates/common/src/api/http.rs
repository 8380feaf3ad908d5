//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::Backend;
use crate::config::ApiConfig;
use crate::errors::{AppError, Result};
use crate::metrics::{collection_label, RequestMetrics};

/// HTTP client for the remote reservoir API
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client with JSON headers and the configured blanket timeout
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let action = format!("{} {}", method, path);
        let metrics = RequestMetrics::start(method.as_str(), collection_label(path));

        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics.finish(0);
                warn!(action = %action, error = %e, timeout = e.is_timeout(), "Request failed");
                return Err(AppError::transport(action, e.status(), e.to_string()));
            }
        };

        let status = response.status();
        metrics.finish(status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(action = %action, status = status.as_u16(), "API returned error status");

            if status == StatusCode::NOT_FOUND && method == Method::GET {
                return Err(AppError::NotFound {
                    resource: collection_label(path).to_string(),
                    id: path.to_string(),
                });
            }
            return Err(AppError::transport(action, Some(status), body));
        }

        let bytes = response.bytes().await?;
        debug!(action = %action, status = status.as_u16(), bytes = bytes.len(), "Request completed");

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }

    fn name(&self) -> &str {
        "http"
    }
}
