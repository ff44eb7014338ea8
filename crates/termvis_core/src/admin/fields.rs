//! Select-field data for add/edit and quick-edit forms.

use crate::registry::vocabulary::VisibilityRegistry;
use serde::Serialize;

/// Form input name used by add/edit and quick-edit fields.
pub const FIELD_NAME: &str = "term-visibility";

/// One `<option>` entry bound to an entity's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// User-facing field labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLabels {
    pub singular: String,
    pub plural: String,
    pub description: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            singular: "Visibility".to_string(),
            plural: "Visibilities".to_string(),
            description: "Set term visibility to provide custom behaviors.".to_string(),
        }
    }
}

/// Builds the option list in registry order, marking `current` as selected.
///
/// Only an exact id match is selected.
pub fn select_options(registry: &VisibilityRegistry, current: Option<&str>) -> Vec<SelectOption> {
    registry
        .options()
        .iter()
        .map(|option| SelectOption {
            id: option.id.clone(),
            label: option.label.clone(),
            selected: current == Some(option.id.as_str()),
        })
        .collect()
}
