//! ReservoirOS Common Library
//!
//! Client core for the reservoir engineering dashboard:
//! - Typed repositories over the remote reservoir API
//! - Foreign-key label resolution and joined list rows
//! - Concurrent view dependency loading
//! - Create/edit/delete coordination for each list view
//! - Error types, configuration and metrics

pub mod api;
pub mod batch;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod resolver;
pub mod views;

// Re-export commonly used types
pub use api::Api;
pub use config::AppConfig;
pub use dashboard::DashboardSummary;
pub use errors::{AppError, Result};
pub use loader::{Collection, DependencyLoader, ReferenceSet, ViewKind};
pub use views::{EntityView, ProjectsView, ReservoirsView, WellsView};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
