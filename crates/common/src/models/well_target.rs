//! Well target entity

use serde::{Deserialize, Serialize};

use super::{path_segment, EntityId, MutableResource, ProjectCode, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellTarget {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    pub project_id: ProjectCode,
    pub reservoir_details_id: EntityId,

    pub type_well_targets_id: EntityId,
    pub type_tubings_id: EntityId,
    pub type_functions_id: EntityId,

    pub entry_point_x: f64,
    pub entry_point_y: f64,
    pub entry_point_z: f64,

    pub target_x: f64,
    pub target_y: f64,
    pub target_z: f64,

    /// Technical coefficient
    pub tec: f64,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// A point in the reservoir's coordinate system
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WellTarget {
    pub fn entry_point(&self) -> Coordinates {
        Coordinates {
            x: self.entry_point_x,
            y: self.entry_point_y,
            z: self.entry_point_z,
        }
    }

    pub fn target(&self) -> Coordinates {
        Coordinates {
            x: self.target_x,
            y: self.target_y,
            z: self.target_z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWellTarget {
    pub name: String,
    pub project_id: ProjectCode,
    pub reservoir_details_id: EntityId,
    pub type_well_targets_id: EntityId,
    pub type_tubings_id: EntityId,
    pub type_functions_id: EntityId,
    pub entry_point_x: f64,
    pub entry_point_y: f64,
    pub entry_point_z: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_z: f64,
    pub tec: f64,
}

/// Project and reservoir are fixed once the well exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWellTarget {
    pub name: String,
    pub type_well_targets_id: EntityId,
    pub type_tubings_id: EntityId,
    pub type_functions_id: EntityId,
    pub entry_point_x: f64,
    pub entry_point_y: f64,
    pub entry_point_z: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_z: f64,
    pub tec: f64,
}

impl Resource for WellTarget {
    type Key = EntityId;

    const COLLECTION: &'static str = "/well_targets";
    const NAME: &'static str = "well target";

    fn key(&self) -> Option<EntityId> {
        (self.id != 0).then_some(self.id)
    }

    fn has_key(&self, key: &EntityId) -> bool {
        self.id == *key
    }

    fn lookup_path(key: &EntityId) -> String {
        format!("{}/id/{}", Self::COLLECTION, path_segment(key))
    }
}

impl MutableResource for WellTarget {
    type Create = CreateWellTarget;
    type Update = UpdateWellTarget;
}
