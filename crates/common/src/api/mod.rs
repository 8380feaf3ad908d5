//! Remote API access
//!
//! Provides:
//! - A JSON transport abstraction with HTTP and in-memory backends
//! - One typed repository per remote collection
//!
//! Every repository call is a single remote call. Nothing is cached
//! and nothing is retried.

mod backend;
mod http;
mod memory;
mod repository;

pub use backend::{create_backend, Backend};
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, RecordedRequest};
pub use repository::Repository;
pub use reqwest::StatusCode;

use crate::config::ApiConfig;
use crate::errors::Result;
use crate::models::{
    CcusStrategy, FunctionType, Project, Reservoir, Resource, TubingType, WellTarget,
    WellTargetType,
};
use std::sync::Arc;

/// Entry point bundling repositories over one shared backend
#[derive(Clone)]
pub struct Api {
    backend: Arc<dyn Backend>,
}

impl Api {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Build the backend selected by configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(create_backend(config)?))
    }

    /// Repository for any resource type
    pub fn repository<R: Resource>(&self) -> Repository<R> {
        Repository::new(self.backend.clone())
    }

    pub fn projects(&self) -> Repository<Project> {
        self.repository()
    }

    pub fn reservoirs(&self) -> Repository<Reservoir> {
        self.repository()
    }

    pub fn well_targets(&self) -> Repository<WellTarget> {
        self.repository()
    }

    pub fn ccus_strategies(&self) -> Repository<CcusStrategy> {
        self.repository()
    }

    pub fn well_target_types(&self) -> Repository<WellTargetType> {
        self.repository()
    }

    pub fn tubing_types(&self) -> Repository<TubingType> {
        self.repository()
    }

    pub fn function_types(&self) -> Repository<FunctionType> {
        self.repository()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}
