//! Visibility assignment store.
//!
//! # Responsibility
//! - Get/set/clear one entity's visibility through an injected metadata store.
//! - Trigger best-effort cache invalidation when the caller asks for it.
//!
//! # Invariants
//! - A blank value deletes; an empty string is never stored.
//! - Stored values are not validated against the vocabulary.
//! - Invalidation failure never fails or rolls back a completed write.

use crate::model::entity::{EntityId, TaxonomyScope};
use crate::model::visibility::VISIBILITY_META_KEY;
use crate::repo::meta_repo::{CacheInvalidator, MetaStoreError, MetadataStore};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Assignment-level error. Absence is `None`, never an error.
#[derive(Debug)]
pub enum AssignmentError {
    /// Metadata store read/write failure, propagated without retry.
    BackingStore(MetaStoreError),
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackingStore(err) => write!(f, "visibility backing store failure: {err}"),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BackingStore(err) => Some(err),
        }
    }
}

impl From<MetaStoreError> for AssignmentError {
    fn from(value: MetaStoreError) -> Self {
        Self::BackingStore(value)
    }
}

/// What a `set` call did to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentChange {
    /// Value inserted or replaced.
    Stored,
    /// Existing value removed.
    Cleared,
    /// Blank value with nothing stored; no-op.
    AlreadyAbsent,
}

impl AssignmentChange {
    fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Cleared => "cleared",
            Self::AlreadyAbsent => "already_absent",
        }
    }
}

/// Cache invalidation result after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    Skipped,
    Invalidated,
    /// Invalidation failed; the write is kept and reads may be stale.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    pub change: AssignmentChange,
    pub cache: CacheOutcome,
}

/// Owns the `entity_id -> visibility` mapping on top of a metadata store.
pub struct AssignmentStore<M: MetadataStore, C: CacheInvalidator> {
    meta: M,
    invalidator: C,
    meta_key: String,
}

impl<M: MetadataStore, C: CacheInvalidator> AssignmentStore<M, C> {
    /// Creates a store writing under the `visibility` metadata key.
    pub fn new(meta: M, invalidator: C) -> Self {
        Self::with_meta_key(meta, invalidator, VISIBILITY_META_KEY)
    }

    pub fn with_meta_key(meta: M, invalidator: C, meta_key: impl Into<String>) -> Self {
        Self {
            meta,
            invalidator,
            meta_key: meta_key.into(),
        }
    }

    /// Backing metadata store.
    pub fn meta(&self) -> &M {
        &self.meta
    }

    pub fn meta_key(&self) -> &str {
        self.meta_key.as_str()
    }

    /// Returns the stored value, or `None` when the entity has no assignment.
    pub fn get(&self, entity: &EntityId) -> Result<Option<String>, AssignmentError> {
        match self.meta.get_meta(entity, &self.meta_key) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(
                    "event=visibility_get module=assignment status=error entity={} error={}",
                    entity, err
                );
                Err(err.into())
            }
        }
    }

    /// Stores `value`, or clears the assignment when `value` is blank.
    ///
    /// Surrounding whitespace is trimmed before the upsert, so `" hidden "`
    /// is stored and read back as `"hidden"`.
    ///
    /// When `clean_cache` is set, the downstream cache for `entity` is
    /// invalidated after the write succeeds.
    pub fn set(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
        value: &str,
        clean_cache: bool,
    ) -> Result<SetOutcome, AssignmentError> {
        let value = value.trim();
        let written = if value.is_empty() {
            self.meta
                .delete_meta(entity, &self.meta_key)
                .map(|existed| {
                    if existed {
                        AssignmentChange::Cleared
                    } else {
                        AssignmentChange::AlreadyAbsent
                    }
                })
        } else {
            self.meta
                .set_meta(entity, &self.meta_key, value)
                .map(|()| AssignmentChange::Stored)
        };

        let change = match written {
            Ok(change) => change,
            Err(err) => {
                error!(
                    "event=visibility_set module=assignment status=error entity={} scope={} error={}",
                    entity, scope, err
                );
                return Err(err.into());
            }
        };

        let cache = if clean_cache {
            self.invalidate(entity, scope)
        } else {
            CacheOutcome::Skipped
        };

        info!(
            "event=visibility_set module=assignment status=ok entity={} scope={} change={} value_len={}",
            entity,
            scope,
            change.as_str(),
            value.len()
        );
        Ok(SetOutcome { change, cache })
    }

    fn invalidate(&self, entity: &EntityId, scope: &TaxonomyScope) -> CacheOutcome {
        match self.invalidator.invalidate(entity, scope) {
            Ok(()) => CacheOutcome::Invalidated,
            Err(err) => {
                warn!(
                    "event=cache_invalidate module=assignment status=error entity={} scope={} error={}",
                    entity, scope, err
                );
                CacheOutcome::Failed(err.to_string())
            }
        }
    }
}
