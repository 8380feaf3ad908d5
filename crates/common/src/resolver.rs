//! Foreign-key label resolution
//!
//! Turns a reference key into the display name of the matching entry in
//! a previously fetched reference collection. A miss is an expected
//! outcome and degrades to a placeholder that embeds the raw key.

use std::fmt::Display;

use crate::models::{Labeled, Resource};

const ID_PLACEHOLDER: &str = "{id}";

/// Placeholder text for a key with no match, e.g. `"Reservoir ID: {id}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTemplate(&'static str);

impl LabelTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Interpolate the raw key. Templates without `{id}` get it appended.
    pub fn render(&self, key: &impl Display) -> String {
        if self.0.contains(ID_PLACEHOLDER) {
            self.0.replace(ID_PLACEHOLDER, &key.to_string())
        } else {
            format!("{}{}", self.0, key)
        }
    }
}

pub const STRATEGY_FALLBACK: LabelTemplate = LabelTemplate::new("Strategy ID: {id}");
pub const PROJECT_FALLBACK: LabelTemplate = LabelTemplate::new("Project ID: {id}");
pub const RESERVOIR_FALLBACK: LabelTemplate = LabelTemplate::new("Reservoir ID: {id}");
pub const WELL_TYPE_FALLBACK: LabelTemplate = LabelTemplate::new("Well type ID: {id}");
pub const TUBING_FALLBACK: LabelTemplate = LabelTemplate::new("Tubing ID: {id}");
pub const FUNCTION_FALLBACK: LabelTemplate = LabelTemplate::new("Function ID: {id}");

/// Resolve `key` against `references`.
///
/// Linear search with exact key equality. An entry with a blank name
/// counts as a miss so the label is never empty. Never fails.
pub fn resolve_label<R>(key: &R::Key, references: &[R], fallback: LabelTemplate) -> String
where
    R: Resource + Labeled,
{
    references
        .iter()
        .find(|r| r.has_key(key))
        .map(Labeled::label)
        .filter(|label| !label.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.render(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, ProjectCode, Reservoir, TubingType};

    fn reservoir(id: i64, name: &str) -> Reservoir {
        Reservoir {
            id,
            name_reservoir: name.to_string(),
            project_id: ProjectCode::from("PRJ-0001"),
            created_at: None,
        }
    }

    #[test]
    fn test_match_returns_name() {
        let refs = vec![reservoir(1, "Tupi"), reservoir(7, "Buzios")];
        assert_eq!(resolve_label(&7, &refs, RESERVOIR_FALLBACK), "Buzios");
    }

    #[test]
    fn test_miss_returns_placeholder() {
        let refs = vec![reservoir(1, "Tupi")];
        assert_eq!(resolve_label(&7, &refs, RESERVOIR_FALLBACK), "Reservoir ID: 7");
    }

    #[test]
    fn test_empty_collection_returns_placeholder() {
        let refs: Vec<TubingType> = Vec::new();
        assert_eq!(resolve_label(&3, &refs, TUBING_FALLBACK), "Tubing ID: 3");
    }

    #[test]
    fn test_blank_name_falls_back() {
        let refs = vec![reservoir(7, "  ")];
        assert_eq!(resolve_label(&7, &refs, RESERVOIR_FALLBACK), "Reservoir ID: 7");
    }

    #[test]
    fn test_project_codes_compare_as_strings() {
        let refs = vec![Project {
            id: 7,
            project_id: ProjectCode::from("007"),
            name_project: "Libra".to_string(),
            type_ccus_strategies_id: 1,
            created_at: None,
        }];

        // The integer id 7 is not the external identifier
        assert_eq!(
            resolve_label(&ProjectCode::from("7"), &refs, PROJECT_FALLBACK),
            "Project ID: 7"
        );
        assert_eq!(resolve_label(&ProjectCode::from("007"), &refs, PROJECT_FALLBACK), "Libra");
    }

    #[test]
    fn test_template_without_placeholder() {
        assert_eq!(LabelTemplate::new("#").render(&12), "#12");
    }

    #[test]
    fn test_every_key_resolves_without_panic() {
        let refs = vec![reservoir(1, "Tupi"), reservoir(2, "Buzios")];
        for key in [i64::MIN, -1, 0, 1, 2, 3, i64::MAX] {
            let label = resolve_label(&key, &refs, RESERVOIR_FALLBACK);
            match key {
                1 => assert_eq!(label, "Tupi"),
                2 => assert_eq!(label, "Buzios"),
                _ => assert_eq!(label, format!("Reservoir ID: {}", key)),
            }
        }
    }
}
