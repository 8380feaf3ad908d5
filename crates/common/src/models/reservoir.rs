//! Reservoir entity

use serde::{Deserialize, Serialize};

use super::{EntityId, Labeled, MutableResource, ProjectCode, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservoir {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name_reservoir: String,

    /// Owning project's external identifier
    pub project_id: ProjectCode,

    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReservoir {
    pub name_reservoir: String,
    pub project_id: ProjectCode,
}

/// Partial patch: the owning project cannot be reassigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReservoir {
    pub name_reservoir: String,
}

impl Resource for Reservoir {
    type Key = EntityId;

    const COLLECTION: &'static str = "/reservoir_details";
    const NAME: &'static str = "reservoir";

    fn key(&self) -> Option<EntityId> {
        (self.id != 0).then_some(self.id)
    }

    fn has_key(&self, key: &EntityId) -> bool {
        self.id == *key
    }
}

impl MutableResource for Reservoir {
    type Create = CreateReservoir;
    type Update = UpdateReservoir;
}

impl Labeled for Reservoir {
    fn label(&self) -> &str {
        &self.name_reservoir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_omits_project() {
        let body = serde_json::to_value(UpdateReservoir {
            name_reservoir: "Tupi".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "name_reservoir": "Tupi" }));
    }
}
