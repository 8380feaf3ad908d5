//! Domain models for the reservoir engineering API
//!
//! Every entity is owned by the remote API; the client only holds
//! transient copies. Payload types for create/update live next to the
//! entity they build.

mod ccus_strategy;
mod keys;
mod lookup;
mod project;
mod reservoir;
mod well_target;

pub use ccus_strategy::{CcusStrategy, CcusStrategyPayload};
pub use keys::{EntityId, ProjectCode};
pub use lookup::{FunctionType, TubingType, WellTargetType};
pub use project::{Project, ProjectPayload};
pub use reservoir::{CreateReservoir, Reservoir, UpdateReservoir};
pub use well_target::{Coordinates, CreateWellTarget, UpdateWellTarget, WellTarget};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};

/// Escaped in a key segment: everything except unreserved characters
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Render a key as a single URL path segment
pub fn path_segment(key: &impl Display) -> String {
    utf8_percent_encode(&key.to_string(), KEY_SEGMENT).to_string()
}

/// A remote collection the client can read.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key used to address a single item and to reference it from other entities
    type Key: Debug + Display + Clone + PartialEq + Send + Sync + 'static;

    /// Collection path relative to the API base URL
    const COLLECTION: &'static str;

    /// Human-readable entity name used in notifications and logs
    const NAME: &'static str;

    /// The entity's own key, `None` when the server omitted it
    fn key(&self) -> Option<Self::Key>;

    /// Exact key equality, no coercion between representations
    fn has_key(&self, key: &Self::Key) -> bool;

    /// Path for update and delete
    fn item_path(key: &Self::Key) -> String {
        format!("{}/{}", Self::COLLECTION, path_segment(key))
    }

    /// Path for a by-id read
    fn lookup_path(key: &Self::Key) -> String {
        Self::item_path(key)
    }
}

/// A collection that also accepts create, update and delete.
pub trait MutableResource: Resource {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
}

/// An entity with a display name, usable as a reference collection.
pub trait Labeled {
    fn label(&self) -> &str;
}
