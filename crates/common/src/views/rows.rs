//! Joined view model
//!
//! A list row is an entity plus the display labels of the references it
//! carries. Rows keep the fetch order of the primary collection.

use serde::Serialize;

use crate::models::{Labeled, Resource};
use crate::resolver::{resolve_label, LabelTemplate};

/// Stable identity of a row within one render
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowIdentity {
    /// The entity's own key
    Key(String),
    /// Position in the fetched list, used when the key is absent
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLabel {
    pub field: &'static str,
    pub value: String,
}

/// One list row
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRow<E> {
    pub identity: RowIdentity,
    pub entity: E,
    pub labels: Vec<ResolvedLabel>,
}

impl<E> EnrichedRow<E> {
    pub fn label(&self, field: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.field == field)
            .map(|l| l.value.as_str())
    }
}

/// A derived display column
pub struct LabelColumn<'a, E> {
    field: &'static str,
    render: Box<dyn Fn(&E) -> String + Send + Sync + 'a>,
}

impl<'a, E> LabelColumn<'a, E> {
    pub fn new(field: &'static str, render: impl Fn(&E) -> String + Send + Sync + 'a) -> Self {
        Self {
            field,
            render: Box::new(render),
        }
    }

    /// Column resolving a foreign key against a reference collection
    pub fn reference<R>(
        field: &'static str,
        references: &'a [R],
        key: impl Fn(&E) -> R::Key + Send + Sync + 'a,
        fallback: LabelTemplate,
    ) -> Self
    where
        R: Resource + Labeled,
    {
        Self::new(field, move |entity| {
            resolve_label(&key(entity), references, fallback)
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    fn render(&self, entity: &E) -> ResolvedLabel {
        ResolvedLabel {
            field: self.field,
            value: (self.render)(entity),
        }
    }
}

/// Zip entities with their resolved labels.
///
/// Output has exactly one row per entity, in input order.
pub fn build_rows<E: Resource>(entities: Vec<E>, columns: &[LabelColumn<'_, E>]) -> Vec<EnrichedRow<E>> {
    entities
        .into_iter()
        .enumerate()
        .map(|(position, entity)| {
            let identity = entity
                .key()
                .map(|k| RowIdentity::Key(k.to_string()))
                .unwrap_or(RowIdentity::Position(position));
            let labels = columns.iter().map(|c| c.render(&entity)).collect();

            EnrichedRow {
                identity,
                entity,
                labels,
            }
        })
        .collect()
}
