//! View dependency loading
//!
//! Each view declares which collections must be present before it can
//! render. The loader fetches the missing ones concurrently, reuses any
//! collection the view already holds, and reports failures without
//! blocking the rest of the batch.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::api::Api;
use crate::batch::settle_all;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::{
    CcusStrategy, FunctionType, Project, Reservoir, Resource, TubingType, WellTarget,
    WellTargetType,
};

/// A remote collection a view may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    Reservoirs,
    WellTargets,
    CcusStrategies,
    WellTargetTypes,
    TubingTypes,
    FunctionTypes,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Reservoirs => "reservoirs",
            Collection::WellTargets => "well_targets",
            Collection::CcusStrategies => "ccus_strategies",
            Collection::WellTargetTypes => "well_target_types",
            Collection::TubingTypes => "tubing_types",
            Collection::FunctionTypes => "function_types",
        }
    }

    /// Remote collection path
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Projects => Project::COLLECTION,
            Collection::Reservoirs => Reservoir::COLLECTION,
            Collection::WellTargets => WellTarget::COLLECTION,
            Collection::CcusStrategies => CcusStrategy::COLLECTION,
            Collection::WellTargetTypes => WellTargetType::COLLECTION,
            Collection::TubingTypes => TubingType::COLLECTION,
            Collection::FunctionTypes => FunctionType::COLLECTION,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A screen or dialog with a fixed dependency set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    ProjectList,
    ReservoirList,
    WellList,
    ProjectForm,
    ReservoirForm,
    WellForm,
    Dashboard,
}

impl ViewKind {
    /// Collections that must be settled before the view is ready
    pub fn dependencies(&self) -> &'static [Collection] {
        match self {
            ViewKind::ProjectList | ViewKind::ProjectForm => &[Collection::CcusStrategies],
            ViewKind::ReservoirList | ViewKind::ReservoirForm => &[Collection::Projects],
            ViewKind::WellList => &[Collection::Reservoirs],
            ViewKind::WellForm => &[
                Collection::Projects,
                Collection::Reservoirs,
                Collection::WellTargetTypes,
                Collection::TubingTypes,
                Collection::FunctionTypes,
            ],
            ViewKind::Dashboard => &[
                Collection::Projects,
                Collection::Reservoirs,
                Collection::WellTargets,
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::ProjectList => "project_list",
            ViewKind::ReservoirList => "reservoir_list",
            ViewKind::WellList => "well_list",
            ViewKind::ProjectForm => "project_form",
            ViewKind::ReservoirForm => "reservoir_form",
            ViewKind::WellForm => "well_form",
            ViewKind::Dashboard => "dashboard",
        }
    }
}

/// One fetched collection, typed
#[derive(Debug, Clone)]
pub enum LoadedCollection {
    Projects(Vec<Project>),
    Reservoirs(Vec<Reservoir>),
    WellTargets(Vec<WellTarget>),
    CcusStrategies(Vec<CcusStrategy>),
    WellTargetTypes(Vec<WellTargetType>),
    TubingTypes(Vec<TubingType>),
    FunctionTypes(Vec<FunctionType>),
}

/// Collections held by one view, keyed by [`Collection`].
///
/// `None` means not loaded (never fetched, or the fetch failed). Readers
/// get an empty slice in that case so label resolution falls back.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    projects: Option<Vec<Project>>,
    reservoirs: Option<Vec<Reservoir>>,
    well_targets: Option<Vec<WellTarget>>,
    ccus_strategies: Option<Vec<CcusStrategy>>,
    well_target_types: Option<Vec<WellTargetType>>,
    tubing_types: Option<Vec<TubingType>>,
    function_types: Option<Vec<FunctionType>>,
}

impl ReferenceSet {
    pub fn contains(&self, collection: Collection) -> bool {
        match collection {
            Collection::Projects => self.projects.is_some(),
            Collection::Reservoirs => self.reservoirs.is_some(),
            Collection::WellTargets => self.well_targets.is_some(),
            Collection::CcusStrategies => self.ccus_strategies.is_some(),
            Collection::WellTargetTypes => self.well_target_types.is_some(),
            Collection::TubingTypes => self.tubing_types.is_some(),
            Collection::FunctionTypes => self.function_types.is_some(),
        }
    }

    /// Loaded collections in declaration order
    pub fn loaded(&self) -> Vec<Collection> {
        [
            Collection::Projects,
            Collection::Reservoirs,
            Collection::WellTargets,
            Collection::CcusStrategies,
            Collection::WellTargetTypes,
            Collection::TubingTypes,
            Collection::FunctionTypes,
        ]
        .into_iter()
        .filter(|c| self.contains(*c))
        .collect()
    }

    pub fn insert(&mut self, loaded: LoadedCollection) {
        match loaded {
            LoadedCollection::Projects(v) => self.projects = Some(v),
            LoadedCollection::Reservoirs(v) => self.reservoirs = Some(v),
            LoadedCollection::WellTargets(v) => self.well_targets = Some(v),
            LoadedCollection::CcusStrategies(v) => self.ccus_strategies = Some(v),
            LoadedCollection::WellTargetTypes(v) => self.well_target_types = Some(v),
            LoadedCollection::TubingTypes(v) => self.tubing_types = Some(v),
            LoadedCollection::FunctionTypes(v) => self.function_types = Some(v),
        }
    }

    /// Drop a collection so the next load fetches it again
    pub fn invalidate(&mut self, collection: Collection) {
        match collection {
            Collection::Projects => self.projects = None,
            Collection::Reservoirs => self.reservoirs = None,
            Collection::WellTargets => self.well_targets = None,
            Collection::CcusStrategies => self.ccus_strategies = None,
            Collection::WellTargetTypes => self.well_target_types = None,
            Collection::TubingTypes => self.tubing_types = None,
            Collection::FunctionTypes => self.function_types = None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.as_deref().unwrap_or_default()
    }

    pub fn reservoirs(&self) -> &[Reservoir] {
        self.reservoirs.as_deref().unwrap_or_default()
    }

    pub fn well_targets(&self) -> &[WellTarget] {
        self.well_targets.as_deref().unwrap_or_default()
    }

    pub fn ccus_strategies(&self) -> &[CcusStrategy] {
        self.ccus_strategies.as_deref().unwrap_or_default()
    }

    pub fn well_target_types(&self) -> &[WellTargetType] {
        self.well_target_types.as_deref().unwrap_or_default()
    }

    pub fn tubing_types(&self) -> &[TubingType] {
        self.tubing_types.as_deref().unwrap_or_default()
    }

    pub fn function_types(&self) -> &[FunctionType] {
        self.function_types.as_deref().unwrap_or_default()
    }
}

/// A dependency whose fetch failed
#[derive(Debug)]
pub struct LoadFailure {
    pub collection: Collection,
    pub error: AppError,
}

/// What one load cycle did
#[derive(Debug, Default)]
pub struct LoadReport {
    pub fetched: Vec<Collection>,
    pub reused: Vec<Collection>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> Vec<Collection> {
        self.failures.iter().map(|f| f.collection).collect()
    }
}

/// Fetches view dependencies through the repositories
#[derive(Clone)]
pub struct DependencyLoader {
    api: Api,
}

impl DependencyLoader {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Load a view's dependency set from scratch
    pub async fn load_view_dependencies(&self, view: ViewKind) -> (ReferenceSet, LoadReport) {
        let mut references = ReferenceSet::default();
        let report = self.load_into(view, &mut references).await;
        (references, report)
    }

    /// Load whatever part of the view's dependency set `held` is missing.
    ///
    /// Returns only after every issued fetch has settled.
    pub async fn load_into(&self, view: ViewKind, held: &mut ReferenceSet) -> LoadReport {
        let mut report = LoadReport::default();
        let mut fetches = Vec::new();

        for &collection in view.dependencies() {
            if held.contains(collection) {
                report.reused.push(collection);
            } else {
                fetches.push((collection, self.fetch(collection)));
            }
        }

        for settled in settle_all(fetches).await {
            match settled.outcome {
                Ok(loaded) => {
                    held.insert(loaded);
                    report.fetched.push(settled.key);
                }
                Err(error) => {
                    warn!(
                        view = view.name(),
                        collection = %settled.key,
                        error = %error,
                        "Dependency fetch failed"
                    );
                    report.failures.push(LoadFailure {
                        collection: settled.key,
                        error,
                    });
                }
            }
        }

        metrics::record_view_load(view.name(), report.failures.len());
        debug!(
            view = view.name(),
            fetched = report.fetched.len(),
            reused = report.reused.len(),
            failed = report.failures.len(),
            "View dependencies settled"
        );

        report
    }

    /// Fetch one collection, typed
    pub fn fetch(&self, collection: Collection) -> BoxFuture<'static, Result<LoadedCollection>> {
        let api = self.api.clone();
        match collection {
            Collection::Projects => {
                async move { api.projects().list_all().await.map(LoadedCollection::Projects) }.boxed()
            }
            Collection::Reservoirs => {
                async move { api.reservoirs().list_all().await.map(LoadedCollection::Reservoirs) }.boxed()
            }
            Collection::WellTargets => {
                async move { api.well_targets().list_all().await.map(LoadedCollection::WellTargets) }.boxed()
            }
            Collection::CcusStrategies => async move {
                api.ccus_strategies()
                    .list_all()
                    .await
                    .map(LoadedCollection::CcusStrategies)
            }
            .boxed(),
            Collection::WellTargetTypes => async move {
                api.well_target_types()
                    .list_all()
                    .await
                    .map(LoadedCollection::WellTargetTypes)
            }
            .boxed(),
            Collection::TubingTypes => {
                async move { api.tubing_types().list_all().await.map(LoadedCollection::TubingTypes) }.boxed()
            }
            Collection::FunctionTypes => async move {
                api.function_types()
                    .list_all()
                    .await
                    .map(LoadedCollection::FunctionTypes)
            }
            .boxed(),
        }
    }
}
