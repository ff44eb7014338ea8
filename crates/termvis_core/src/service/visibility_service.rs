//! Host-facing visibility facade.
//!
//! # Responsibility
//! - Expose get/set/list/render boundary operations to the host.
//! - Validate form submissions against the vocabulary before persisting.
//!
//! # Invariants
//! - `set_visibility` is permissive; only `submit_visibility` validates.
//! - Rendering never fails on unknown values; only backing-store errors surface.

use crate::admin::fields::{select_options, SelectOption};
use crate::model::entity::{EntityId, TaxonomyScope};
use crate::model::visibility::VisibilityOption;
use crate::registry::vocabulary::{InvalidOption, VisibilityRegistry};
use crate::repo::meta_repo::{CacheInvalidator, MetadataStore};
use crate::service::assignment_service::{AssignmentError, AssignmentStore, SetOutcome};
use crate::service::presentation::PresentationAdapter;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for visibility use-cases.
#[derive(Debug)]
pub enum VisibilityServiceError {
    /// Submitted value is not a registered option id.
    InvalidOption(InvalidOption),
    /// Assignment store failure.
    Assignment(AssignmentError),
}

impl Display for VisibilityServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOption(err) => write!(f, "{err}"),
            Self::Assignment(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VisibilityServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOption(err) => Some(err),
            Self::Assignment(err) => Some(err),
        }
    }
}

impl From<InvalidOption> for VisibilityServiceError {
    fn from(value: InvalidOption) -> Self {
        Self::InvalidOption(value)
    }
}

impl From<AssignmentError> for VisibilityServiceError {
    fn from(value: AssignmentError) -> Self {
        Self::Assignment(value)
    }
}

/// Visibility facade over an assignment store and presentation adapter.
pub struct VisibilityService<M: MetadataStore, C: CacheInvalidator> {
    store: AssignmentStore<M, C>,
    presentation: PresentationAdapter,
}

impl<M: MetadataStore, C: CacheInvalidator> VisibilityService<M, C> {
    pub fn new(store: AssignmentStore<M, C>, presentation: PresentationAdapter) -> Self {
        Self {
            store,
            presentation,
        }
    }

    /// Wires a service with the default meta key.
    pub fn from_parts(
        meta: M,
        invalidator: C,
        registry: Arc<VisibilityRegistry>,
        sentinel: impl Into<String>,
    ) -> Self {
        Self::new(
            AssignmentStore::new(meta, invalidator),
            PresentationAdapter::new(registry, sentinel),
        )
    }

    pub fn store(&self) -> &AssignmentStore<M, C> {
        &self.store
    }

    pub fn presentation(&self) -> &PresentationAdapter {
        &self.presentation
    }

    pub fn registry(&self) -> &VisibilityRegistry {
        self.presentation.registry()
    }

    /// Returns the stored visibility, or `None` when unassigned.
    pub fn get_visibility(
        &self,
        entity: &EntityId,
    ) -> Result<Option<String>, VisibilityServiceError> {
        Ok(self.store.get(entity)?)
    }

    /// Stores or clears a visibility value without vocabulary validation.
    pub fn set_visibility(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
        value: &str,
        clean_cache: bool,
    ) -> Result<SetOutcome, VisibilityServiceError> {
        Ok(self.store.set(entity, scope, value, clean_cache)?)
    }

    /// Form-submission path: blank clears, anything else must be registered.
    pub fn submit_visibility(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
        value: &str,
        clean_cache: bool,
    ) -> Result<SetOutcome, VisibilityServiceError> {
        if !value.trim().is_empty() {
            if let Err(err) = self.registry().validate(value) {
                warn!(
                    "event=visibility_submit module=service status=rejected entity={} scope={} value_len={}",
                    entity,
                    scope,
                    value.trim().len()
                );
                return Err(err.into());
            }
        }
        self.set_visibility(entity, scope, value, clean_cache)
    }

    /// Registered options in display order.
    pub fn list_visibility_options(&self) -> &[VisibilityOption] {
        self.registry().options()
    }

    /// Label of the entity's visibility, or the sentinel.
    pub fn render_visibility_label(
        &self,
        entity: &EntityId,
    ) -> Result<String, VisibilityServiceError> {
        Ok(self.presentation.render(&self.store, entity)?)
    }

    /// Select options bound to the entity's current value.
    ///
    /// `None` yields an unbound list (add-term and quick-edit forms).
    pub fn select_options_for(
        &self,
        entity: Option<&EntityId>,
    ) -> Result<Vec<SelectOption>, VisibilityServiceError> {
        let current = match entity {
            Some(entity) => self.store.get(entity)?,
            None => None,
        };
        Ok(select_options(self.registry(), current.as_deref()))
    }
}
