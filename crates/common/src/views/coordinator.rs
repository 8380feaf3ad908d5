//! Mutation sequencing for a view
//!
//! Every mutation runs validate, remote call, primary re-fetch, then
//! notification, strictly in that order. A failed call never triggers
//! the re-fetch.

use tracing::warn;

use super::dialog::{SubmitRequest, SubmitStep};
use super::{EntityView, KeyOf, ViewSpec};
use crate::metrics;
use crate::models::Resource;

impl<S: ViewSpec> EntityView<S> {
    /// Submit the open dialog. Returns whether the mutation succeeded.
    pub async fn submit(&mut self) -> bool {
        let request = match self.dialog.begin_submit() {
            SubmitStep::Send(request) => request,
            SubmitStep::Rejected(notification) => {
                self.notify(notification);
                return false;
            }
            SubmitStep::Ignored => return false,
        };

        let name = <S::Entity as Resource>::NAME;
        let repository = self.api.repository::<S::Entity>();
        let (action, outcome) = match &request {
            SubmitRequest::Create(payload) => ("create", repository.create(payload).await.map(|_| ())),
            SubmitRequest::Update(key, payload) => {
                ("update", repository.update(key, payload).await.map(|_| ()))
            }
        };

        metrics::record_mutation(name, action, outcome.is_ok());
        if let Err(e) = &outcome {
            warn!(resource = name, action, error = %e, "Mutation failed");
        }

        let notification = self.dialog.finish_submit(&outcome);
        if outcome.is_ok() {
            self.refresh().await;
        }
        self.notify(notification);

        outcome.is_ok()
    }

    /// Enter delete confirmation for `key`
    pub fn request_delete(&mut self, key: KeyOf<S>) -> bool {
        self.delete.request(key)
    }

    /// Leave delete confirmation without a remote call
    pub fn cancel_delete(&mut self) -> bool {
        self.delete.cancel()
    }

    /// Delete the held target, then re-fetch. Confirm stays disabled
    /// until both have completed.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(key) = self.delete.begin() else {
            return false;
        };

        let name = <S::Entity as Resource>::NAME;
        let outcome = self.api.repository::<S::Entity>().delete(&key).await;

        metrics::record_mutation(name, "delete", outcome.is_ok());
        match &outcome {
            Ok(()) => {
                self.refresh().await;
            }
            Err(e) => warn!(resource = name, key = %key, error = %e, "Delete failed"),
        }

        let notification = self.delete.finish(name, &outcome);
        self.notify(notification);

        outcome.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        DeletePhase, FormPreset, NotificationLevel, ProjectsView, ReservoirsView, WellForm,
        WellsView,
    };
    use crate::api::{Api, InMemoryBackend};
    use crate::loader::Collection;
    use crate::models::ProjectCode;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn backend() -> Arc<InMemoryBackend> {
        Arc::new(InMemoryBackend::with_reference_data())
    }

    fn seed_field(backend: &InMemoryBackend) {
        backend
            .seed(
                "projects",
                vec![json!({
                    "id": 1,
                    "project_id": "PRJ-0001",
                    "name_project": "Libra",
                    "type_ccus_strategies_id": 2,
                    "created_at": "2025-03-04T10:00:00"
                })],
            )
            .unwrap();
        backend
            .seed(
                "reservoir_details",
                vec![
                    json!({ "id": 7, "name_reservoir": "Buzios", "project_id": "PRJ-0001" }),
                    json!({ "id": 8, "name_reservoir": "Tupi", "project_id": "PRJ-0001" }),
                ],
            )
            .unwrap();
        backend
            .seed(
                "well_targets",
                vec![json!({
                    "id": 21,
                    "name": "W-21",
                    "project_id": "PRJ-0001",
                    "reservoir_details_id": 7,
                    "type_well_targets_id": 1,
                    "type_tubings_id": 1,
                    "type_functions_id": 1,
                    "entry_point_x": 0, "entry_point_y": 0, "entry_point_z": 0,
                    "target_x": 100, "target_y": 50, "target_z": -2500,
                    "tec": 0.7
                })],
            )
            .unwrap();
    }

    fn complete_well(form: &mut WellForm) {
        form.name = "W-30".to_string();
        form.project_id = "PRJ-0001".to_string();
        form.type_well_targets_id = Some(2);
        form.type_tubings_id = Some(1);
        form.type_functions_id = Some(3);
    }

    #[tokio::test]
    async fn test_create_project_appears_in_list() {
        let backend = backend();
        let mut view = ProjectsView::new(Api::new(backend.clone()));
        view.load().await;
        assert!(view.rows().is_empty());

        view.open_create(None).await;
        let form = view.dialog_mut().form_mut();
        form.name_project = "North Field".to_string();
        form.type_ccus_strategies_id = Some(3);

        assert!(view.submit().await);
        assert!(!view.dialog().is_open());

        let row = view
            .rows()
            .iter()
            .find(|r| r.entity.name_project == "North Field")
            .expect("created project listed");
        assert_eq!(row.entity.type_ccus_strategies_id, 3);
        assert!(row.entity.id > 0);
        assert!(row.entity.created_at.is_some());
        assert_eq!(row.label("strategy"), Some("Storage"));

        let notes = view.take_notifications();
        assert_eq!(notes.last().map(|n| n.level), Some(NotificationLevel::Success));
        assert!(view.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_reservoir_degrades_well_label() {
        let backend = backend();
        seed_field(&backend);
        let api = Api::new(backend.clone());

        let mut wells = WellsView::new(api.clone());
        wells.load().await;
        assert_eq!(wells.rows()[0].label("reservoir"), Some("Buzios"));

        let mut reservoirs = ReservoirsView::new(api.clone());
        reservoirs.load().await;
        assert!(reservoirs.request_delete(7));
        assert!(reservoirs.confirm_delete().await);
        assert!(reservoirs.rows().iter().all(|r| r.entity.id != 7));
        assert_eq!(reservoirs.delete_confirmation().phase(), &DeletePhase::Idle);

        wells.load().await;
        assert_eq!(wells.rows().len(), 1);
        assert_eq!(wells.rows()[0].label("reservoir"), Some("Reservoir ID: 7"));
    }

    #[tokio::test]
    async fn test_empty_well_name_issues_no_remote_call() {
        let backend = backend();
        seed_field(&backend);
        let mut view = WellsView::new(Api::new(backend.clone()));
        view.load().await;
        view.open_create(Some(FormPreset::Reservoir(7))).await;
        complete_well(view.dialog_mut().form_mut());
        view.dialog_mut().form_mut().name.clear();
        backend.clear_requests();

        assert!(!view.submit().await);

        assert!(backend.requests().is_empty());
        assert!(view.dialog().is_open());
        assert_eq!(view.dialog().form().reservoir_details_id, Some(7));
        assert_eq!(
            view.notifications().last().map(|n| n.level),
            Some(NotificationLevel::Validation)
        );
    }

    #[tokio::test]
    async fn test_well_form_reuses_held_reservoirs() {
        let backend = backend();
        seed_field(&backend);
        let mut view = WellsView::new(Api::new(backend.clone()));
        view.load().await;
        backend.clear_requests();

        let report = view.open_create(None).await;

        assert_eq!(report.reused, vec![Collection::Reservoirs]);
        assert_eq!(backend.request_count("GET", "/reservoir_details"), 0);
        assert_eq!(backend.requests().len(), 4);
        assert_eq!(view.references().tubing_types().len(), 3);
    }

    #[tokio::test]
    async fn test_reopened_well_form_sees_new_project() {
        let backend = backend();
        seed_field(&backend);
        let api = Api::new(backend.clone());
        let mut wells = WellsView::new(api.clone());
        wells.load().await;

        wells.open_create(None).await;
        assert_eq!(wells.references().projects().len(), 1);
        wells.close_dialog();

        let mut projects = ProjectsView::new(api);
        projects.load().await;
        projects.open_create(None).await;
        let form = projects.dialog_mut().form_mut();
        form.name_project = "North Field".to_string();
        form.type_ccus_strategies_id = Some(3);
        assert!(projects.submit().await);

        backend.clear_requests();
        let report = wells.open_create(None).await;

        assert_eq!(report.reused, vec![Collection::Reservoirs]);
        assert_eq!(backend.request_count("GET", "/projects"), 1);
        assert_eq!(backend.request_count("GET", "/reservoir_details"), 0);
        assert!(wells
            .references()
            .projects()
            .iter()
            .any(|p| p.name_project == "North Field"));
    }

    #[tokio::test]
    async fn test_zero_reference_ids_issue_no_remote_call() {
        let backend = backend();
        seed_field(&backend);
        let mut view = WellsView::new(Api::new(backend.clone()));
        view.load().await;
        view.open_create(Some(FormPreset::Reservoir(0))).await;
        let form = view.dialog_mut().form_mut();
        complete_well(form);
        form.type_well_targets_id = Some(0);
        form.type_tubings_id = Some(0);
        form.type_functions_id = Some(0);
        backend.clear_requests();

        assert!(!view.submit().await);

        assert_eq!(backend.request_count("POST", "/well_targets"), 0);
        assert!(backend.requests().is_empty());
        assert!(view.dialog().is_open());
        assert_eq!(
            view.notifications().last().map(|n| n.level),
            Some(NotificationLevel::Validation)
        );
    }

    #[tokio::test]
    async fn test_blank_names_render_placeholder() {
        let backend = backend();
        seed_field(&backend);
        backend
            .seed(
                "reservoir_details",
                vec![json!({ "id": 9, "name_reservoir": "", "project_id": "PRJ-0001" })],
            )
            .unwrap();
        let mut view = ReservoirsView::new(Api::new(backend.clone()));
        view.load().await;

        assert_eq!(view.rows()[0].label("name"), Some("Buzios"));
        assert_eq!(view.rows()[2].label("name"), Some("Name not available"));
        assert_eq!(view.rows()[2].entity.name_reservoir, "");
    }

    #[tokio::test]
    async fn test_failed_update_keeps_dialog_and_values() {
        let backend = backend();
        seed_field(&backend);
        let mut view = ReservoirsView::new(Api::new(backend.clone()));
        view.load().await;

        assert!(view.open_edit(&8).await);
        assert_eq!(view.dialog().form().name_reservoir, "Tupi");
        view.dialog_mut().form_mut().name_reservoir = "Tupi Sul".to_string();

        backend
            .fail_collection("reservoir_details", StatusCode::INTERNAL_SERVER_ERROR)
            .unwrap();
        backend.clear_requests();
        assert!(!view.submit().await);

        assert_eq!(backend.request_count("PUT", "/reservoir_details/8"), 1);
        assert_eq!(backend.request_count("GET", "/reservoir_details"), 0);
        assert!(view.dialog().is_open());
        assert!(!view.dialog().is_submitting());
        assert_eq!(view.dialog().form().name_reservoir, "Tupi Sul");
        let note = view.notifications().last().unwrap();
        assert_eq!(note.message, "Failed to update reservoir");

        backend.restore_collection("reservoir_details").unwrap();
        assert!(view.submit().await);
        assert!(view.rows().iter().any(|r| r.entity.name_reservoir == "Tupi Sul"));
    }

    #[tokio::test]
    async fn test_edit_reads_by_id_when_not_held() {
        let backend = backend();
        seed_field(&backend);
        let mut view = WellsView::new(Api::new(backend.clone()));

        assert!(view.open_edit(&21).await);
        assert_eq!(backend.request_count("GET", "/well_targets/id/21"), 1);
        assert_eq!(view.dialog().form().name, "W-21");
        assert_eq!(view.dialog().form().target_z, -2500.0);

        assert!(!view.open_edit(&99).await);
        assert_eq!(
            view.notifications().last().map(|n| n.message.as_str()),
            Some("Failed to load well target")
        );
    }

    #[tokio::test]
    async fn test_cancel_delete_issues_no_call() {
        let backend = backend();
        seed_field(&backend);
        let mut view = ReservoirsView::new(Api::new(backend.clone()));
        view.load().await;
        backend.clear_requests();

        view.request_delete(8);
        assert!(view.cancel_delete());
        assert!(!view.confirm_delete().await);
        assert!(backend.requests().is_empty());
        assert_eq!(view.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_returns_to_idle() {
        let backend = backend();
        seed_field(&backend);
        let mut view = ReservoirsView::new(Api::new(backend.clone()));
        view.load().await;

        view.request_delete(42);
        assert!(!view.confirm_delete().await);
        assert_eq!(view.delete_confirmation().phase(), &DeletePhase::Idle);
        assert_eq!(view.rows().len(), 2);
        assert_eq!(
            view.notifications().last().map(|n| n.message.as_str()),
            Some("Failed to delete reservoir")
        );
    }

    #[tokio::test]
    async fn test_partial_dependency_failure_still_renders() {
        let backend = backend();
        seed_field(&backend);
        backend
            .fail_collection("projects", StatusCode::SERVICE_UNAVAILABLE)
            .unwrap();
        let mut view = ReservoirsView::new(Api::new(backend.clone()));

        let report = view.load().await;

        assert!(!view.is_loading());
        assert_eq!(report.failed(), vec![Collection::Projects]);
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.rows()[0].label("project"), Some("Project ID: PRJ-0001"));
        assert_eq!(view.rows()[0].label("created_on"), Some("Date not available"));
        assert_eq!(view.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_project_delete_leaves_reservoirs() {
        let backend = backend();
        seed_field(&backend);
        let api = Api::new(backend.clone());
        let mut projects = ProjectsView::new(api.clone());
        projects.load().await;
        assert_eq!(projects.rows()[0].label("created_on"), Some("04/03/2025"));

        projects.request_delete(ProjectCode::from("PRJ-0001"));
        assert!(projects.confirm_delete().await);
        assert!(projects.rows().is_empty());

        let mut reservoirs = ReservoirsView::new(api);
        reservoirs.load().await;
        assert_eq!(reservoirs.rows().len(), 2);
        assert_eq!(reservoirs.rows()[1].label("project"), Some("Project ID: PRJ-0001"));
    }
}
