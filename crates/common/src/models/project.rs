//! Project entity

use serde::{Deserialize, Serialize};

use super::{EntityId, Labeled, MutableResource, ProjectCode, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: EntityId,

    /// External identifier, referenced by reservoirs and well targets
    #[serde(default)]
    pub project_id: ProjectCode,

    #[serde(default)]
    pub name_project: String,

    pub type_ccus_strategies_id: EntityId,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create and update share one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub name_project: String,
    pub type_ccus_strategies_id: EntityId,
}

impl Resource for Project {
    type Key = ProjectCode;

    const COLLECTION: &'static str = "/projects";
    const NAME: &'static str = "project";

    fn key(&self) -> Option<ProjectCode> {
        (!self.project_id.is_empty()).then(|| self.project_id.clone())
    }

    fn has_key(&self, key: &ProjectCode) -> bool {
        self.project_id == *key
    }
}

impl MutableResource for Project {
    type Create = ProjectPayload;
    type Update = ProjectPayload;
}

impl Labeled for Project {
    fn label(&self) -> &str {
        &self.name_project
    }
}
