//! JSON snapshot of the dashboard views

use reservoiros_common::models::{Project, Reservoir, WellTarget};
use reservoiros_common::views::{EnrichedRow, EntityView, Notification, ViewSpec};
use reservoiros_common::{
    Api, DashboardSummary, DependencyLoader, ProjectsView, ReservoirsView, WellsView,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ViewSnapshot<E> {
    pub rows: Vec<EnrichedRow<E>>,
    pub notifications: Vec<Notification>,
}

impl<E: Clone> ViewSnapshot<E> {
    fn take<S: ViewSpec<Entity = E>>(view: &mut EntityView<S>) -> Self {
        Self {
            rows: view.rows().to_vec(),
            notifications: view.take_notifications(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub summary: DashboardSummary,
    pub projects: ViewSnapshot<Project>,
    pub reservoirs: ViewSnapshot<Reservoir>,
    pub well_targets: ViewSnapshot<WellTarget>,
}

/// Load the summary and every list view concurrently.
///
/// Each view fetches its own collections; failures end up in the view's
/// notifications rather than aborting the snapshot.
pub async fn collect(api: Api) -> Snapshot {
    let loader = DependencyLoader::new(api.clone());
    let mut projects = ProjectsView::new(api.clone());
    let mut reservoirs = ReservoirsView::new(api.clone());
    let mut wells = WellsView::new(api);

    let ((summary, _), _, _, _) = tokio::join!(
        DashboardSummary::load(&loader),
        projects.load(),
        reservoirs.load(),
        wells.load()
    );

    Snapshot {
        summary,
        projects: ViewSnapshot::take(&mut projects),
        reservoirs: ViewSnapshot::take(&mut reservoirs),
        well_targets: ViewSnapshot::take(&mut wells),
    }
}
