//! In-process emulation of the remote API
//!
//! Stores each collection as JSON documents and answers the same paths
//! the HTTP API does. Used by tests and by `backend = "memory"`.

use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::percent_decode_str;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::Backend;
use crate::errors::{AppError, Result};

/// A request observed by the in-memory backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    failures: HashMap<String, StatusCode>,
    requests: Vec<RecordedRequest>,
}

/// Mock implementation of the remote collection endpoints
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

/// Parsed request path
enum Route<'a> {
    Collection(&'a str),
    Item(&'a str, &'a str),
    WellById(&'a str),
    WellsByProject(&'a str),
}

fn route(path: &str) -> Option<Route<'_>> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["well_targets", "id", id] => Some(Route::WellById(*id)),
        ["well_targets", "project_id", code] => Some(Route::WellsByProject(*code)),
        [collection] if !collection.is_empty() => Some(Route::Collection(*collection)),
        [collection, key] => Some(Route::Item(*collection, *key)),
        _ => None,
    }
}

fn decode_segment(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

/// Projects are addressed by their external identifier, everything else by id
fn matches_key(collection: &str, record: &Value, key: &str) -> bool {
    let key = decode_segment(key);
    let key = &*key;
    if collection == "projects" {
        return record.get("project_id").and_then(Value::as_str) == Some(key);
    }
    match key.parse::<i64>() {
        Ok(id) => record.get("id").and_then(Value::as_i64) == Some(id),
        Err(_) => false,
    }
}

fn not_found(method: &str, path: &str) -> AppError {
    if method == "GET" {
        AppError::NotFound {
            resource: path.trim_matches('/').split('/').next().unwrap_or_default().to_string(),
            id: path.to_string(),
        }
    } else {
        AppError::transport(format!("{} {}", method, path), Some(StatusCode::NOT_FOUND), "not found")
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Backend pre-populated with the read-only reference collections
    pub fn with_reference_data() -> Self {
        let now = Utc::now().to_rfc3339();

        let strategies = [
            (1, "Capture", "Carbon capture at source", 100),
            (2, "Utilization", "Enhanced oil recovery with CO2", 200),
            (3, "Storage", "Geological storage in depleted reservoirs", 300),
        ]
        .into_iter()
        .map(|(id, name, description, code)| {
            json!({
                "id": id,
                "name": name,
                "description": description,
                "internal_code": code,
                "created_at": now,
                "updated_at": now,
            })
        })
        .collect();

        let named = |names: &[&str]| -> Vec<Value> {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| json!({ "id": i as i64 + 1, "name": name }))
                .collect()
        };

        let collections: HashMap<String, Vec<Value>> = [
            ("type_ccus_strategies", strategies),
            ("type_well_targets", named(&["Producer", "Injector", "Observation"])),
            ("type_tubings", named(&["3 1/2\"", "4 1/2\"", "5 1/2\""])),
            ("type_functions", named(&["Oil production", "Gas injection", "Water injection"])),
        ]
        .into_iter()
        .map(|(collection, records)| (collection.to_string(), records))
        .collect();

        let next_id = collections
            .values()
            .flatten()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(MemoryState {
                collections,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| AppError::Internal {
            message: "in-memory backend lock poisoned".to_string(),
        })
    }

    /// Insert records as if the server already held them. Ids are kept.
    pub fn seed(&self, collection: &str, records: Vec<Value>) -> Result<()> {
        let mut state = self.lock()?;
        let max_id = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        state.next_id = state.next_id.max(max_id + 1);
        state
            .collections
            .entry(collection.trim_matches('/').to_string())
            .or_default()
            .extend(records);
        Ok(())
    }

    /// Make every request to a collection fail with `status`
    pub fn fail_collection(&self, collection: &str, status: StatusCode) -> Result<()> {
        self.lock()?
            .failures
            .insert(collection.trim_matches('/').to_string(), status);
        Ok(())
    }

    /// Undo [`fail_collection`](Self::fail_collection)
    pub fn restore_collection(&self, collection: &str) -> Result<()> {
        self.lock()?.failures.remove(collection.trim_matches('/'));
        Ok(())
    }

    /// Every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().map(|s| s.requests.clone()).unwrap_or_default()
    }

    /// Number of requests with `method` whose path starts with `prefix`
    pub fn request_count(&self, method: &str, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }

    pub fn clear_requests(&self) {
        if let Ok(mut state) = self.lock() {
            state.requests.clear();
        }
    }

    /// Records the request and checks injected failures
    fn begin(&self, method: &'static str, path: &str) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock()?;
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
        });
        debug!(method, path, "In-memory request");

        let collection = path.trim_matches('/').split('/').next().unwrap_or_default();
        if let Some(status) = state.failures.get(collection) {
            return Err(AppError::transport(
                format!("{} {}", method, path),
                Some(*status),
                "injected failure",
            ));
        }
        Ok(state)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get(&self, path: &str) -> Result<Value> {
        let state = self.begin("GET", path)?;
        let empty = Vec::new();

        match route(path) {
            Some(Route::Collection(collection)) => Ok(Value::Array(
                state.collections.get(collection).unwrap_or(&empty).clone(),
            )),
            Some(Route::Item(collection, key)) => state
                .collections
                .get(collection)
                .and_then(|records| records.iter().find(|r| matches_key(collection, r, key)))
                .cloned()
                .ok_or_else(|| not_found("GET", path)),
            Some(Route::WellById(id)) => state
                .collections
                .get("well_targets")
                .and_then(|records| records.iter().find(|r| matches_key("well_targets", r, id)))
                .cloned()
                .ok_or_else(|| not_found("GET", path)),
            Some(Route::WellsByProject(code)) => Ok(Value::Array(
                state
                    .collections
                    .get("well_targets")
                    .unwrap_or(&empty)
                    .iter()
                    .filter(|r| {
                        r.get("project_id").and_then(Value::as_str) == Some(&*decode_segment(code))
                    })
                    .cloned()
                    .collect(),
            )),
            None => Err(not_found("GET", path)),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let mut state = self.begin("POST", path)?;
        let Some(Route::Collection(collection)) = route(path) else {
            return Err(not_found("POST", path));
        };
        let Value::Object(mut record) = body else {
            return Err(AppError::transport(
                format!("POST {}", path),
                Some(StatusCode::UNPROCESSABLE_ENTITY),
                "body must be a JSON object",
            ));
        };

        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now().to_rfc3339();

        record.insert("id".to_string(), json!(id));
        record.insert("created_at".to_string(), json!(now));
        if collection == "projects" {
            record.insert("project_id".to_string(), json!(format!("PRJ-{:04}", id)));
        }
        if collection == "type_ccus_strategies" {
            record.insert("updated_at".to_string(), json!(now));
        }

        let record = Value::Object(record);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value> {
        let mut state = self.begin("PUT", path)?;
        let Some(Route::Item(collection, key)) = route(path) else {
            return Err(not_found("PUT", path));
        };
        let Value::Object(changes) = body else {
            return Err(AppError::transport(
                format!("PUT {}", path),
                Some(StatusCode::UNPROCESSABLE_ENTITY),
                "body must be a JSON object",
            ));
        };

        let record = state
            .collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| matches_key(collection, r, key)))
            .ok_or_else(|| not_found("PUT", path))?;

        if let Some(fields) = record.as_object_mut() {
            merge(fields, changes);
            if collection == "type_ccus_strategies" {
                fields.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.begin("DELETE", path)?;
        let Some(Route::Item(collection, key)) = route(path) else {
            return Err(not_found("DELETE", path));
        };

        let records = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| not_found("DELETE", path))?;
        let before = records.len();
        records.retain(|r| !matches_key(collection, r, key));

        if records.len() == before {
            return Err(not_found("DELETE", path));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn merge(target: &mut Map<String, Value>, changes: Map<String, Value>) {
    for (field, value) in changes {
        target.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_assigns_server_fields() {
        let backend = InMemoryBackend::new();
        let created = backend
            .post("/projects", json!({ "name_project": "North Field", "type_ccus_strategies_id": 3 }))
            .await
            .unwrap();

        assert_eq!(created["id"], json!(1));
        assert_eq!(created["project_id"], json!("PRJ-0001"));
        assert!(created["created_at"].is_string());

        let fetched = backend.get("/projects/PRJ-0001").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_reference_data_ids_are_not_reused() {
        let backend = InMemoryBackend::with_reference_data();
        let tubings = backend.get("/type_tubings").await.unwrap();
        assert_eq!(tubings.as_array().map(Vec::len), Some(3));

        let created = backend
            .post("/type_ccus_strategies", json!({ "name": "Mineralization", "description": "", "internal_code": 400 }))
            .await
            .unwrap();
        assert_eq!(created["id"], json!(4));
        assert!(created["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_put_merges_fields() {
        let backend = InMemoryBackend::new();
        backend
            .seed("reservoir_details", vec![json!({ "id": 7, "name_reservoir": "Old", "project_id": "PRJ-0001" })])
            .unwrap();

        let updated = backend
            .put("/reservoir_details/7", json!({ "name_reservoir": "New" }))
            .await
            .unwrap();
        assert_eq!(updated["name_reservoir"], json!("New"));
        assert_eq!(updated["project_id"], json!("PRJ-0001"));
    }

    #[tokio::test]
    async fn test_well_lookup_variants() {
        let backend = InMemoryBackend::new();
        backend
            .seed(
                "well_targets",
                vec![
                    json!({ "id": 1, "project_id": "A" }),
                    json!({ "id": 2, "project_id": "B" }),
                    json!({ "id": 3, "project_id": "A" }),
                ],
            )
            .unwrap();

        assert_eq!(backend.get("/well_targets/id/2").await.unwrap()["project_id"], json!("B"));
        let by_project = backend.get("/well_targets/project_id/A").await.unwrap();
        assert_eq!(by_project.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_delete_missing_is_error() {
        let backend = InMemoryBackend::new();
        let err = backend.delete("/reservoir_details/99").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_injected_failure_and_request_log() {
        let backend = InMemoryBackend::with_reference_data();
        backend.fail_collection("type_tubings", StatusCode::SERVICE_UNAVAILABLE).unwrap();

        let err = backend.get("/type_tubings").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

        backend.restore_collection("type_tubings").unwrap();
        let tubings = backend.get("/type_tubings").await.unwrap();
        assert_eq!(tubings.as_array().map(Vec::len), Some(3));
        assert_eq!(backend.request_count("GET", "/type_tubings"), 2);
    }

    #[tokio::test]
    async fn test_seed_advances_id_sequence() {
        let backend = InMemoryBackend::new();
        backend.seed("reservoir_details", vec![json!({ "id": 40 })]).unwrap();
        let created = backend
            .post("/reservoir_details", json!({ "name_reservoir": "R", "project_id": "A" }))
            .await
            .unwrap();
        assert_eq!(created["id"], json!(41));
    }
}
