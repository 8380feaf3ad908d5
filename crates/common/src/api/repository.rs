//! Typed repository over one remote collection

use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

use super::Backend;
use crate::errors::Result;
use crate::models::{path_segment, MutableResource, ProjectCode, Resource, WellTarget};

/// Repository for one entity collection
pub struct Repository<R> {
    backend: Arc<dyn Backend>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            _resource: PhantomData,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

impl<R: Resource> Repository<R> {
    /// Create a new repository over the given backend
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            _resource: PhantomData,
        }
    }

    /// Fetch the whole collection in server order
    pub async fn list_all(&self) -> Result<Vec<R>> {
        decode(self.backend.get(R::COLLECTION).await?)
    }

    /// Fetch a single item
    pub async fn get_by_id(&self, key: &R::Key) -> Result<R> {
        decode(self.backend.get(&R::lookup_path(key)).await?)
    }
}

impl<R: MutableResource> Repository<R> {
    /// Create an item, returning the server's representation
    pub async fn create(&self, payload: &R::Create) -> Result<R> {
        let body = serde_json::to_value(payload)?;
        let created: R = decode(self.backend.post(R::COLLECTION, body).await?)?;

        info!(
            resource = R::NAME,
            key = %created.key().map(|k| k.to_string()).unwrap_or_default(),
            "Created"
        );
        Ok(created)
    }

    /// Update an item in place
    pub async fn update(&self, key: &R::Key, payload: &R::Update) -> Result<R> {
        let body = serde_json::to_value(payload)?;
        let updated = decode(self.backend.put(&R::item_path(key), body).await?)?;

        info!(resource = R::NAME, key = %key, "Updated");
        Ok(updated)
    }

    /// Delete an item. References to it elsewhere are left untouched.
    pub async fn delete(&self, key: &R::Key) -> Result<()> {
        self.backend.delete(&R::item_path(key)).await?;

        info!(resource = R::NAME, key = %key, "Deleted");
        Ok(())
    }
}

impl Repository<WellTarget> {
    /// Well targets belonging to one project
    pub async fn list_by_project(&self, project: &ProjectCode) -> Result<Vec<WellTarget>> {
        let path = format!("{}/project_id/{}", WellTarget::COLLECTION, path_segment(project));
        decode(self.backend.get(&path).await?)
    }
}
