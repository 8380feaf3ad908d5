//! Entity views
//!
//! Each list screen is an [`EntityView`]: its own primary collection,
//! its own reference collections, enriched rows, a create/edit dialog
//! and a delete confirmation. Nothing is shared between views.
//!
//! Failures never escape a view. They become [`Notification`]s and the
//! view stays usable.

mod coordinator;
mod dialog;
pub mod display;
mod forms;
mod rows;

pub use dialog::{
    DeleteConfirmation, DeletePhase, FormDialog, FormMode, Notification, NotificationLevel,
    SubmitPhase, SubmitRequest, SubmitStep,
};
pub use forms::{EntityForm, FormPreset, ProjectForm, ReservoirForm, WellForm};
pub use rows::{build_rows, EnrichedRow, LabelColumn, ResolvedLabel, RowIdentity};

use tracing::{info, warn};

use crate::api::Api;
use crate::errors::AppError;
use crate::loader::{DependencyLoader, LoadReport, ReferenceSet, ViewKind};
use crate::models::{MutableResource, Project, Reservoir, Resource, WellTarget};
use crate::resolver::{PROJECT_FALLBACK, RESERVOIR_FALLBACK, STRATEGY_FALLBACK};
use display::{display_name, format_coordinates, format_created_at};

/// What one list screen shows and how it labels its rows
pub trait ViewSpec: Send + Sync + 'static {
    type Entity: MutableResource;
    type Form: EntityForm<Entity = Self::Entity>;

    const LIST: ViewKind;

    /// Derived columns, resolved against the view's reference collections
    fn label_columns(references: &ReferenceSet) -> Vec<LabelColumn<'_, Self::Entity>>;
}

pub struct ProjectsSpec;

impl ViewSpec for ProjectsSpec {
    type Entity = Project;
    type Form = ProjectForm;

    const LIST: ViewKind = ViewKind::ProjectList;

    fn label_columns(references: &ReferenceSet) -> Vec<LabelColumn<'_, Project>> {
        vec![
            LabelColumn::new("name", |p: &Project| display_name(&p.name_project)),
            LabelColumn::reference(
                "strategy",
                references.ccus_strategies(),
                |p: &Project| p.type_ccus_strategies_id,
                STRATEGY_FALLBACK,
            ),
            LabelColumn::new("created_on", |p: &Project| format_created_at(p.created_at.as_deref())),
        ]
    }
}

pub struct ReservoirsSpec;

impl ViewSpec for ReservoirsSpec {
    type Entity = Reservoir;
    type Form = ReservoirForm;

    const LIST: ViewKind = ViewKind::ReservoirList;

    fn label_columns(references: &ReferenceSet) -> Vec<LabelColumn<'_, Reservoir>> {
        vec![
            LabelColumn::new("name", |r: &Reservoir| display_name(&r.name_reservoir)),
            LabelColumn::reference(
                "project",
                references.projects(),
                |r: &Reservoir| r.project_id.clone(),
                PROJECT_FALLBACK,
            ),
            LabelColumn::new("created_on", |r: &Reservoir| format_created_at(r.created_at.as_deref())),
        ]
    }
}

pub struct WellsSpec;

impl ViewSpec for WellsSpec {
    type Entity = WellTarget;
    type Form = WellForm;

    const LIST: ViewKind = ViewKind::WellList;

    fn label_columns(references: &ReferenceSet) -> Vec<LabelColumn<'_, WellTarget>> {
        vec![
            LabelColumn::new("name", |w: &WellTarget| display_name(&w.name)),
            LabelColumn::reference(
                "reservoir",
                references.reservoirs(),
                |w: &WellTarget| w.reservoir_details_id,
                RESERVOIR_FALLBACK,
            ),
            LabelColumn::new("entry_point", |w: &WellTarget| format_coordinates(w.entry_point())),
            LabelColumn::new("target", |w: &WellTarget| format_coordinates(w.target())),
            LabelColumn::new("created_on", |w: &WellTarget| format_created_at(w.created_at.as_deref())),
        ]
    }
}

pub type ProjectsView = EntityView<ProjectsSpec>;
pub type ReservoirsView = EntityView<ReservoirsSpec>;
pub type WellsView = EntityView<WellsSpec>;

type KeyOf<S> = <<S as ViewSpec>::Entity as Resource>::Key;

/// State owned by one list screen
pub struct EntityView<S: ViewSpec> {
    api: Api,
    loader: DependencyLoader,
    entities: Vec<S::Entity>,
    rows: Vec<EnrichedRow<S::Entity>>,
    references: ReferenceSet,
    loading: bool,
    dialog: FormDialog<S::Form>,
    delete: DeleteConfirmation<KeyOf<S>>,
    notifications: Vec<Notification>,
}

impl<S: ViewSpec> EntityView<S> {
    pub fn new(api: Api) -> Self {
        Self {
            loader: DependencyLoader::new(api.clone()),
            api,
            entities: Vec::new(),
            rows: Vec::new(),
            references: ReferenceSet::default(),
            loading: false,
            dialog: FormDialog::default(),
            delete: DeleteConfirmation::default(),
            notifications: Vec::new(),
        }
    }

    /// Mount: fetch the primary collection and the list's dependency set
    /// concurrently, then rebuild rows once everything has settled.
    pub async fn load(&mut self) -> LoadReport {
        self.loading = true;
        self.references.clear();

        let repository = self.api.repository::<S::Entity>();
        let (primary, report) = tokio::join!(
            repository.list_all(),
            self.loader.load_into(S::LIST, &mut self.references)
        );

        match primary {
            Ok(entities) => self.entities = entities,
            Err(e) => self.load_failed(&e),
        }
        self.report_dependencies(&report);
        self.rebuild_rows();
        self.loading = false;

        report
    }

    /// Re-fetch the primary collection only, keeping held references
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        let result = self.api.repository::<S::Entity>().list_all().await;

        let ok = match result {
            Ok(entities) => {
                self.entities = entities;
                true
            }
            Err(e) => {
                self.load_failed(&e);
                false
            }
        };
        self.rebuild_rows();
        self.loading = false;

        ok
    }

    /// Open the dialog in create mode and load the form's dependencies.
    ///
    /// Collections the list itself depends on are reused from the current
    /// load; the form's other collections are fetched fresh on every open.
    pub async fn open_create(&mut self, preset: Option<FormPreset>) -> LoadReport {
        self.dialog.open_create(preset.as_ref());
        self.load_form_dependencies().await
    }

    /// Open the dialog pre-populated with the entity's current values.
    ///
    /// The entity comes from the held rows when present, otherwise from a
    /// by-id read. Returns whether the dialog opened.
    pub async fn open_edit(&mut self, key: &KeyOf<S>) -> bool {
        let held = self.entities.iter().find(|e| e.has_key(key)).cloned();
        let entity = match held {
            Some(entity) => entity,
            None => match self.api.repository::<S::Entity>().get_by_id(key).await {
                Ok(entity) => entity,
                Err(e) => {
                    let name = <S::Entity as Resource>::NAME;
                    self.notify(Notification::error(format!("Failed to load {}", name), &e));
                    return false;
                }
            },
        };

        if let Err(e) = self.dialog.open_edit(&entity) {
            self.notify(Notification::validation(&e));
            return false;
        }
        self.load_form_dependencies().await;
        true
    }

    pub fn close_dialog(&mut self) {
        self.dialog.close();
    }

    pub fn rows(&self) -> &[EnrichedRow<S::Entity>] {
        &self.rows
    }

    pub fn entities(&self) -> &[S::Entity] {
        &self.entities
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn dialog(&self) -> &FormDialog<S::Form> {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut FormDialog<S::Form> {
        &mut self.dialog
    }

    pub fn delete_confirmation(&self) -> &DeleteConfirmation<KeyOf<S>> {
        &self.delete
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain notifications once they have been shown
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    async fn load_form_dependencies(&mut self) -> LoadReport {
        let form_view = <S::Form as EntityForm>::VIEW;
        for &collection in form_view.dependencies() {
            if !S::LIST.dependencies().contains(&collection) {
                self.references.invalidate(collection);
            }
        }

        let report = self
            .loader
            .load_into(form_view, &mut self.references)
            .await;
        self.report_dependencies(&report);
        self.rebuild_rows();
        report
    }

    fn rebuild_rows(&mut self) {
        let columns = S::label_columns(&self.references);
        self.rows = build_rows(self.entities.clone(), &columns);
    }

    fn load_failed(&mut self, error: &AppError) {
        let collection = <S::Entity as Resource>::COLLECTION;
        self.notify(Notification::error(
            format!("Failed to load {}", collection.trim_start_matches('/')),
            error,
        ));
    }

    fn report_dependencies(&mut self, report: &LoadReport) {
        for failure in &report.failures {
            self.notify(Notification::error(
                format!("Failed to load {}", failure.collection),
                &failure.error,
            ));
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(view = S::LIST.name(), message = %notification.message, "Notification"),
            NotificationLevel::Error | NotificationLevel::Validation => warn!(
                view = S::LIST.name(),
                message = %notification.message,
                detail = notification.detail.as_deref().unwrap_or_default(),
                "Notification"
            ),
        }
        self.notifications.push(notification);
    }
}
