//! Key types shared by every entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned integer primary key
pub type EntityId = i64;

/// External project identifier.
///
/// Reservoirs and well targets reference their project by this string,
/// never by the project's integer id. It is compared as an opaque value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCode(String);

impl ProjectCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ProjectCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_code_is_transparent() {
        let code: ProjectCode = serde_json::from_str("\"PRJ-0001\"").unwrap();
        assert_eq!(code.as_str(), "PRJ-0001");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"PRJ-0001\"");
    }

    #[test]
    fn test_numeric_looking_codes_stay_strings() {
        assert_ne!(ProjectCode::from("7"), ProjectCode::from("07"));
        assert_eq!(ProjectCode::from("7").to_string(), "7");
    }
}
