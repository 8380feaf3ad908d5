//! Read-only lookup types referenced by well targets

use serde::{Deserialize, Serialize};

use super::{EntityId, Labeled, Resource};

macro_rules! lookup_type {
    ($(#[$meta:meta])* $name:ident, $collection:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub id: EntityId,

            #[serde(default)]
            pub name: String,
        }

        impl Resource for $name {
            type Key = EntityId;

            const COLLECTION: &'static str = $collection;
            const NAME: &'static str = $label;

            fn key(&self) -> Option<EntityId> {
                (self.id != 0).then_some(self.id)
            }

            fn has_key(&self, key: &EntityId) -> bool {
                self.id == *key
            }
        }

        impl Labeled for $name {
            fn label(&self) -> &str {
                &self.name
            }
        }
    };
}

lookup_type!(
    /// Well target category
    WellTargetType,
    "/type_well_targets",
    "well target type"
);

lookup_type!(
    /// Tubing category
    TubingType,
    "/type_tubings",
    "tubing type"
);

lookup_type!(
    /// Well function category
    FunctionType,
    "/type_functions",
    "function type"
);
