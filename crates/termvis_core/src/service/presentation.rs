//! Read-only label rendering for display contexts.
//!
//! # Invariants
//! - Absent or unrecognized values render as the sentinel, never as an error
//!   and never as the raw stored id.
//! - No caching here; caching belongs to the metadata store.

use crate::model::entity::EntityId;
use crate::model::visibility::DEFAULT_SENTINEL;
use crate::registry::vocabulary::VisibilityRegistry;
use crate::repo::meta_repo::{CacheInvalidator, MetadataStore};
use crate::service::assignment_service::{AssignmentError, AssignmentStore};
use std::sync::Arc;

/// Maps stored visibility values to labels.
#[derive(Debug, Clone)]
pub struct PresentationAdapter {
    registry: Arc<VisibilityRegistry>,
    sentinel: String,
}

impl PresentationAdapter {
    pub fn new(registry: Arc<VisibilityRegistry>, sentinel: impl Into<String>) -> Self {
        Self {
            registry,
            sentinel: sentinel.into(),
        }
    }

    /// Adapter using the em-dash sentinel.
    pub fn with_default_sentinel(registry: Arc<VisibilityRegistry>) -> Self {
        Self::new(registry, DEFAULT_SENTINEL)
    }

    pub fn sentinel(&self) -> &str {
        self.sentinel.as_str()
    }

    pub fn registry(&self) -> &VisibilityRegistry {
        &self.registry
    }

    /// Label for a raw stored value.
    pub fn format_value(&self, value: Option<&str>) -> String {
        match value {
            Some(id) => self.registry.label_for(id, &self.sentinel).to_string(),
            None => self.sentinel.clone(),
        }
    }

    /// Reads the entity's assignment and renders its label.
    pub fn render<M: MetadataStore, C: CacheInvalidator>(
        &self,
        store: &AssignmentStore<M, C>,
        entity: &EntityId,
    ) -> Result<String, AssignmentError> {
        let value = store.get(entity)?;
        Ok(self.format_value(value.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::PresentationAdapter;
    use crate::registry::vocabulary::VisibilityRegistry;
    use std::sync::Arc;

    #[test]
    fn format_value_resolves_known_ids() {
        let adapter = PresentationAdapter::with_default_sentinel(Arc::new(
            VisibilityRegistry::default(),
        ));
        assert_eq!(adapter.format_value(Some("private")), "Private");
    }

    #[test]
    fn format_value_uses_sentinel_for_absent_and_unknown() {
        let adapter = PresentationAdapter::new(Arc::new(VisibilityRegistry::default()), "n/a");
        assert_eq!(adapter.format_value(None), "n/a");
        assert_eq!(adapter.format_value(Some("")), "n/a");
        assert_eq!(adapter.format_value(Some("archived")), "n/a");
    }
}
