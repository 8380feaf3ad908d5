//! Landing page summary
//!
//! Counts projects, reservoirs and well targets from one concurrently
//! fetched batch and joins them by project identifier.

use serde::Serialize;

use crate::loader::{Collection, DependencyLoader, LoadReport, ReferenceSet, ViewKind};
use crate::models::ProjectCode;

/// Per-project counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectTally {
    pub project_id: ProjectCode,
    pub name: String,
    pub reservoirs: usize,
    pub well_targets: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub project_count: usize,
    pub reservoir_count: usize,
    pub well_target_count: usize,
    pub projects: Vec<ProjectTally>,
    /// Reservoirs whose project is not in the loaded project list
    pub orphaned_reservoirs: usize,
    /// Wells whose reservoir or project is not in the loaded lists
    pub dangling_well_targets: usize,
    /// Collections that failed to load and were counted as empty
    pub unavailable: Vec<Collection>,
}

impl DashboardSummary {
    /// Fetch the dashboard's collections and tally them
    pub async fn load(loader: &DependencyLoader) -> (Self, LoadReport) {
        let (references, report) = loader.load_view_dependencies(ViewKind::Dashboard).await;
        let mut summary = Self::tally(&references);
        summary.unavailable = report.failed();
        (summary, report)
    }

    /// Tally whatever is loaded.
    ///
    /// Dangling counts only consider references into collections that
    /// actually loaded; an unavailable collection dangles nothing.
    pub fn tally(references: &ReferenceSet) -> Self {
        let projects = references.projects();
        let reservoirs = references.reservoirs();
        let wells = references.well_targets();

        let tallies = projects
            .iter()
            .map(|p| ProjectTally {
                project_id: p.project_id.clone(),
                name: p.name_project.clone(),
                reservoirs: reservoirs.iter().filter(|r| r.project_id == p.project_id).count(),
                well_targets: wells.iter().filter(|w| w.project_id == p.project_id).count(),
            })
            .collect();

        let projects_loaded = references.contains(Collection::Projects);
        let reservoirs_loaded = references.contains(Collection::Reservoirs);
        let known_project = |code: &ProjectCode| projects.iter().any(|p| p.project_id == *code);

        let orphaned_reservoirs = if projects_loaded {
            reservoirs.iter().filter(|r| !known_project(&r.project_id)).count()
        } else {
            0
        };

        let dangling_well_targets = wells
            .iter()
            .filter(|w| {
                let missing_reservoir = reservoirs_loaded
                    && !reservoirs.iter().any(|r| r.id == w.reservoir_details_id);
                let missing_project = projects_loaded && !known_project(&w.project_id);
                missing_reservoir || missing_project
            })
            .count();

        Self {
            project_count: projects.len(),
            reservoir_count: reservoirs.len(),
            well_target_count: wells.len(),
            projects: tallies,
            orphaned_reservoirs,
            dangling_well_targets,
            unavailable: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Api, InMemoryBackend};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn well(id: i64, project: &str, reservoir: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("W-{}", id),
            "project_id": project,
            "reservoir_details_id": reservoir,
            "type_well_targets_id": 1,
            "type_tubings_id": 1,
            "type_functions_id": 1,
            "entry_point_x": 0, "entry_point_y": 0, "entry_point_z": 0,
            "target_x": 0, "target_y": 0, "target_z": -1000,
            "tec": 0.5
        })
    }

    fn seeded() -> Arc<InMemoryBackend> {
        let backend = Arc::new(InMemoryBackend::with_reference_data());
        backend
            .seed(
                "projects",
                vec![
                    json!({ "id": 1, "project_id": "A", "name_project": "Libra", "type_ccus_strategies_id": 1 }),
                    json!({ "id": 2, "project_id": "B", "name_project": "Mero", "type_ccus_strategies_id": 3 }),
                ],
            )
            .unwrap();
        backend
            .seed(
                "reservoir_details",
                vec![
                    json!({ "id": 10, "name_reservoir": "Buzios", "project_id": "A" }),
                    json!({ "id": 11, "name_reservoir": "Tupi", "project_id": "A" }),
                    json!({ "id": 12, "name_reservoir": "Lost", "project_id": "Z" }),
                ],
            )
            .unwrap();
        backend
            .seed("well_targets", vec![well(1, "A", 10), well(2, "B", 99), well(3, "A", 11)])
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn test_summary_counts_and_joins() {
        let loader = DependencyLoader::new(Api::new(seeded()));
        let (summary, report) = DashboardSummary::load(&loader).await;

        assert!(report.is_complete());
        assert_eq!(summary.project_count, 2);
        assert_eq!(summary.reservoir_count, 3);
        assert_eq!(summary.well_target_count, 3);
        assert_eq!(summary.projects[0].reservoirs, 2);
        assert_eq!(summary.projects[0].well_targets, 2);
        assert_eq!(summary.projects[1].reservoirs, 0);
        assert_eq!(summary.projects[1].well_targets, 1);
        assert_eq!(summary.orphaned_reservoirs, 1);
        assert_eq!(summary.dangling_well_targets, 1);
        assert!(summary.unavailable.is_empty());
    }

    #[tokio::test]
    async fn test_failed_collection_counts_as_empty() {
        let backend = seeded();
        backend
            .fail_collection("reservoir_details", StatusCode::BAD_GATEWAY)
            .unwrap();
        let loader = DependencyLoader::new(Api::new(backend));

        let (summary, _) = DashboardSummary::load(&loader).await;

        assert_eq!(summary.reservoir_count, 0);
        assert_eq!(summary.well_target_count, 3);
        assert_eq!(summary.dangling_well_targets, 0);
        assert_eq!(summary.unavailable, vec![Collection::Reservoirs]);
    }
}
