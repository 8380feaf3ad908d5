//! CCUS strategy reference type

use serde::{Deserialize, Serialize};

use super::{EntityId, Labeled, MutableResource, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcusStrategy {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub internal_code: i64,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcusStrategyPayload {
    pub name: String,
    pub description: String,
    pub internal_code: i64,
}

impl Resource for CcusStrategy {
    type Key = EntityId;

    const COLLECTION: &'static str = "/type_ccus_strategies";
    const NAME: &'static str = "CCUS strategy";

    fn key(&self) -> Option<EntityId> {
        (self.id != 0).then_some(self.id)
    }

    fn has_key(&self, key: &EntityId) -> bool {
        self.id == *key
    }
}

// No view mutates strategies, but the remote collection accepts it.
impl MutableResource for CcusStrategy {
    type Create = CcusStrategyPayload;
    type Update = CcusStrategyPayload;
}

impl Labeled for CcusStrategy {
    fn label(&self) -> &str {
        &self.name
    }
}
