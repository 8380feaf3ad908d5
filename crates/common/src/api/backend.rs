//! Transport trait and backend selection

use crate::config::ApiConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{HttpBackend, InMemoryBackend};

/// JSON transport against the remote collection endpoints.
///
/// Paths are relative to the API base URL (`/projects/12`). A non-2xx
/// response is an error; the body of a 2xx response is returned as-is.
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET a collection or a single item
    async fn get(&self, path: &str) -> Result<Value>;

    /// POST a new item, returning the stored representation
    async fn post(&self, path: &str, body: Value) -> Result<Value>;

    /// PUT an update, returning the stored representation
    async fn put(&self, path: &str, body: Value) -> Result<Value>;

    /// DELETE an item
    async fn delete(&self, path: &str) -> Result<()>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Create a backend based on configuration
pub fn create_backend(config: &ApiConfig) -> Result<Arc<dyn Backend>> {
    match config.backend.as_str() {
        "http" => Ok(Arc::new(HttpBackend::new(config)?)),
        "memory" => Ok(Arc::new(InMemoryBackend::with_reference_data())),
        other => Err(AppError::Configuration {
            message: format!("unknown api backend '{}', expected http or memory", other),
        }),
    }
}
