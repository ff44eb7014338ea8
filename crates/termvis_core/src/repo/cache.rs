//! Read-through metadata cache with explicit entity invalidation.
//!
//! # Invariants
//! - Writes go to the inner store first; the cache is updated only on success.
//! - `invalidate` evicts every cached key of the entity, whatever the scope.

use crate::model::entity::{EntityId, TaxonomyScope};
use crate::repo::meta_repo::{CacheInvalidator, InvalidationError, MetaResult, MetadataStore};
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Caches `get_meta` results (including absence) in front of another store.
#[derive(Debug)]
pub struct CachedMetadataStore<M: MetadataStore> {
    inner: M,
    entries: RefCell<HashMap<(EntityId, String), Option<String>>>,
    misses: Cell<u64>,
}

impl<M: MetadataStore> CachedMetadataStore<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
            misses: Cell::new(0),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of cached `(entity, key)` lookups.
    pub fn cached_len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Number of reads that went through to the inner store.
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }
}

impl<M: MetadataStore> MetadataStore for CachedMetadataStore<M> {
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>> {
        let cache_key = (entity.clone(), key.to_string());
        if let Some(hit) = self.entries.borrow().get(&cache_key) {
            return Ok(hit.clone());
        }

        self.misses.set(self.misses.get() + 1);
        let value = self.inner.get_meta(entity, key)?;
        self.entries.borrow_mut().insert(cache_key, value.clone());
        Ok(value)
    }

    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()> {
        self.inner.set_meta(entity, key, value)?;
        self.entries
            .borrow_mut()
            .insert((entity.clone(), key.to_string()), Some(value.to_string()));
        Ok(())
    }

    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool> {
        let existed = self.inner.delete_meta(entity, key)?;
        self.entries
            .borrow_mut()
            .insert((entity.clone(), key.to_string()), None);
        Ok(existed)
    }
}

impl<M: MetadataStore> CacheInvalidator for CachedMetadataStore<M> {
    fn invalidate(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
    ) -> Result<(), InvalidationError> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(cached_entity, _), _| cached_entity != entity);
        debug!(
            "event=cache_invalidate module=cache status=ok scope={} evicted={}",
            scope,
            before - entries.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CachedMetadataStore;
    use crate::model::entity::{parse_scope, EntityId};
    use crate::repo::memory::MemoryMetadataStore;
    use crate::repo::meta_repo::{CacheInvalidator, MetadataStore};

    #[test]
    fn repeated_reads_hit_cache_including_absence() {
        let store = CachedMetadataStore::new(MemoryMetadataStore::new());
        let entity = EntityId::from(9_u64);

        assert_eq!(store.get_meta(&entity, "visibility").unwrap(), None);
        assert_eq!(store.get_meta(&entity, "visibility").unwrap(), None);
        assert_eq!(store.misses(), 1);
    }

    #[test]
    fn invalidate_evicts_only_target_entity() {
        let store = CachedMetadataStore::new(MemoryMetadataStore::new());
        let first = EntityId::from(1_u64);
        let second = EntityId::from(2_u64);
        store.set_meta(&first, "visibility", "public").unwrap();
        store.set_meta(&second, "visibility", "hidden").unwrap();
        assert_eq!(store.cached_len(), 2);

        store
            .invalidate(&first, &parse_scope("category").unwrap())
            .unwrap();
        assert_eq!(store.cached_len(), 1);
        assert_eq!(
            store.get_meta(&first, "visibility").unwrap().as_deref(),
            Some("public")
        );
        assert_eq!(store.misses(), 1);
    }

    #[test]
    fn external_write_is_visible_after_invalidation() {
        let store = CachedMetadataStore::new(MemoryMetadataStore::new());
        let entity = EntityId::from(5_u64);
        assert_eq!(store.get_meta(&entity, "visibility").unwrap(), None);

        store
            .inner()
            .set_meta(&entity, "visibility", "private")
            .unwrap();
        assert_eq!(store.get_meta(&entity, "visibility").unwrap(), None);

        store
            .invalidate(&entity, &parse_scope("post_tag").unwrap())
            .unwrap();
        assert_eq!(
            store.get_meta(&entity, "visibility").unwrap().as_deref(),
            Some("private")
        );
    }
}
