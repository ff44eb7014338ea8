//! Visibility vocabulary entries.

use serde::{Deserialize, Serialize};

/// Metadata key used for visibility assignments.
pub const VISIBILITY_META_KEY: &str = "visibility";
/// Display value used when an entity has no recognized visibility.
pub const DEFAULT_SENTINEL: &str = "\u{2014}";

/// Built-in option id for publicly visible entities.
pub const VISIBILITY_PUBLIC: &str = "public";
/// Built-in option id for entities visible only to privileged readers.
pub const VISIBILITY_PRIVATE: &str = "private";
/// Built-in option id for entities hidden from listings.
pub const VISIBILITY_HIDDEN: &str = "hidden";

/// One selectable visibility value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibilityOption {
    /// Stable key persisted in assignments, e.g. `public`.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl VisibilityOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Returns the built-in option set in display order.
pub fn default_options() -> Vec<VisibilityOption> {
    vec![
        VisibilityOption::new(VISIBILITY_PUBLIC, "Public"),
        VisibilityOption::new(VISIBILITY_PRIVATE, "Private"),
        VisibilityOption::new(VISIBILITY_HIDDEN, "Hidden"),
    ]
}
