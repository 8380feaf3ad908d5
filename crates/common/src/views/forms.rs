//! Create/edit form data
//!
//! A form holds exactly what the user typed. Required fields are checked
//! with `validator` before any payload is built; payload construction
//! then converts the form into the create or update shape for its entity.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::loader::ViewKind;
use crate::models::{
    CreateReservoir, CreateWellTarget, EntityId, MutableResource, Project, ProjectCode,
    ProjectPayload, Reservoir, UpdateReservoir, UpdateWellTarget, WellTarget,
};

/// Foreign key pre-filled when a form opens in create mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPreset {
    /// Owning project
    Project(ProjectCode),
    /// Owning reservoir
    Reservoir(EntityId),
}

/// Form bound to one mutable entity type
pub trait EntityForm: Default + Clone + Validate + Send + Sync {
    type Entity: MutableResource;

    /// Dependency set the form needs before it can render
    const VIEW: ViewKind;

    /// Pre-populate from an existing entity for edit mode
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Apply a create-mode preset. Presets a form has no field for are ignored.
    fn apply_preset(&mut self, preset: &FormPreset);

    fn create_payload(&self) -> Result<<Self::Entity as MutableResource>::Create>;

    fn update_payload(&self) -> Result<<Self::Entity as MutableResource>::Update>;

    /// Required-field check, no remote call
    fn check(&self) -> Result<()> {
        self.validate().map_err(AppError::from)
    }
}

/// A reference id is required and zero means unselected
fn required(value: Option<EntityId>, field: &str) -> Result<EntityId> {
    value.filter(|id| *id > 0).ok_or_else(|| AppError::MissingField {
        field: field.to_string(),
    })
}

fn filled(value: &str, field: &str) -> Result<String> {
    if value.is_empty() {
        return Err(AppError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectForm {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name_project: String,

    #[validate(
        required(message = "CCUS strategy is required"),
        range(min = 1, message = "CCUS strategy is required")
    )]
    pub type_ccus_strategies_id: Option<EntityId>,
}

impl EntityForm for ProjectForm {
    type Entity = Project;

    const VIEW: ViewKind = ViewKind::ProjectForm;

    fn from_entity(project: &Project) -> Self {
        Self {
            name_project: project.name_project.clone(),
            type_ccus_strategies_id: Some(project.type_ccus_strategies_id),
        }
    }

    fn apply_preset(&mut self, _preset: &FormPreset) {}

    fn create_payload(&self) -> Result<ProjectPayload> {
        Ok(ProjectPayload {
            name_project: filled(&self.name_project, "name_project")?,
            type_ccus_strategies_id: required(self.type_ccus_strategies_id, "type_ccus_strategies_id")?,
        })
    }

    fn update_payload(&self) -> Result<ProjectPayload> {
        self.create_payload()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReservoirForm {
    #[validate(length(min = 1, message = "Reservoir name is required"))]
    pub name_reservoir: String,

    /// Owning project's external identifier
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: String,
}

impl EntityForm for ReservoirForm {
    type Entity = Reservoir;

    const VIEW: ViewKind = ViewKind::ReservoirForm;

    fn from_entity(reservoir: &Reservoir) -> Self {
        Self {
            name_reservoir: reservoir.name_reservoir.clone(),
            project_id: reservoir.project_id.to_string(),
        }
    }

    fn apply_preset(&mut self, preset: &FormPreset) {
        if let FormPreset::Project(code) = preset {
            self.project_id = code.to_string();
        }
    }

    fn create_payload(&self) -> Result<CreateReservoir> {
        Ok(CreateReservoir {
            name_reservoir: filled(&self.name_reservoir, "name_reservoir")?,
            project_id: ProjectCode::new(filled(&self.project_id, "project_id")?),
        })
    }

    fn update_payload(&self) -> Result<UpdateReservoir> {
        Ok(UpdateReservoir {
            name_reservoir: filled(&self.name_reservoir, "name_reservoir")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct WellForm {
    #[validate(length(min = 1, message = "Well name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: String,

    #[validate(
        required(message = "Reservoir is required"),
        range(min = 1, message = "Reservoir is required")
    )]
    pub reservoir_details_id: Option<EntityId>,

    #[validate(
        required(message = "Well target type is required"),
        range(min = 1, message = "Well target type is required")
    )]
    pub type_well_targets_id: Option<EntityId>,

    #[validate(
        required(message = "Tubing type is required"),
        range(min = 1, message = "Tubing type is required")
    )]
    pub type_tubings_id: Option<EntityId>,

    #[validate(
        required(message = "Function type is required"),
        range(min = 1, message = "Function type is required")
    )]
    pub type_functions_id: Option<EntityId>,

    pub entry_point_x: f64,
    pub entry_point_y: f64,
    pub entry_point_z: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_z: f64,
    pub tec: f64,
}

impl EntityForm for WellForm {
    type Entity = WellTarget;

    const VIEW: ViewKind = ViewKind::WellForm;

    fn from_entity(well: &WellTarget) -> Self {
        Self {
            name: well.name.clone(),
            project_id: well.project_id.to_string(),
            reservoir_details_id: Some(well.reservoir_details_id),
            type_well_targets_id: Some(well.type_well_targets_id),
            type_tubings_id: Some(well.type_tubings_id),
            type_functions_id: Some(well.type_functions_id),
            entry_point_x: well.entry_point_x,
            entry_point_y: well.entry_point_y,
            entry_point_z: well.entry_point_z,
            target_x: well.target_x,
            target_y: well.target_y,
            target_z: well.target_z,
            tec: well.tec,
        }
    }

    fn apply_preset(&mut self, preset: &FormPreset) {
        match preset {
            FormPreset::Project(code) => self.project_id = code.to_string(),
            FormPreset::Reservoir(id) => self.reservoir_details_id = Some(*id),
        }
    }

    fn create_payload(&self) -> Result<CreateWellTarget> {
        Ok(CreateWellTarget {
            name: filled(&self.name, "name")?,
            project_id: ProjectCode::new(filled(&self.project_id, "project_id")?),
            reservoir_details_id: required(self.reservoir_details_id, "reservoir_details_id")?,
            type_well_targets_id: required(self.type_well_targets_id, "type_well_targets_id")?,
            type_tubings_id: required(self.type_tubings_id, "type_tubings_id")?,
            type_functions_id: required(self.type_functions_id, "type_functions_id")?,
            entry_point_x: self.entry_point_x,
            entry_point_y: self.entry_point_y,
            entry_point_z: self.entry_point_z,
            target_x: self.target_x,
            target_y: self.target_y,
            target_z: self.target_z,
            tec: self.tec,
        })
    }

    fn update_payload(&self) -> Result<UpdateWellTarget> {
        Ok(UpdateWellTarget {
            name: filled(&self.name, "name")?,
            type_well_targets_id: required(self.type_well_targets_id, "type_well_targets_id")?,
            type_tubings_id: required(self.type_tubings_id, "type_tubings_id")?,
            type_functions_id: required(self.type_functions_id, "type_functions_id")?,
            entry_point_x: self.entry_point_x,
            entry_point_y: self.entry_point_y,
            entry_point_z: self.entry_point_z,
            target_x: self.target_x,
            target_y: self.target_y,
            target_z: self.target_z,
            tec: self.tec,
        })
    }
}
