//! Container configuration.

use serde::{Deserialize, Serialize};

/// Options carried by a container and inherited by every container derived
/// from it.
///
/// Deserializes from the camelCase record form, e.g. `{"findRoot": "stats.age"}`.
/// Unrecognized fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Dotted path resolved on each value before `find` evaluates its query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub find_root: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_root(mut self, path: impl Into<String>) -> Self {
        self.find_root = Some(path.into());
        self
    }
}
