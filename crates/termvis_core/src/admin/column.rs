//! Sortable list-table column.

use crate::model::entity::EntityId;
use crate::repo::meta_repo::{CacheInvalidator, MetadataStore};
use crate::service::visibility_service::VisibilityService;
use log::error;

/// Column id registered with the host list table.
pub const COLUMN_ID: &str = "visibility";

/// List column rendering visibility labels for rows.
pub struct VisibilityColumn<'svc, M: MetadataStore, C: CacheInvalidator> {
    service: &'svc VisibilityService<M, C>,
}

impl<'svc, M: MetadataStore, C: CacheInvalidator> VisibilityColumn<'svc, M, C> {
    pub fn new(service: &'svc VisibilityService<M, C>) -> Self {
        Self { service }
    }

    /// Cell text for one row.
    ///
    /// Backing-store failures render the sentinel so one bad row does not
    /// break the whole table.
    pub fn cell(&self, entity: &EntityId) -> String {
        match self.service.render_visibility_label(entity) {
            Ok(label) => label,
            Err(err) => {
                error!(
                    "event=column_render module=admin status=error entity={} error={}",
                    entity, err
                );
                self.service.presentation().sentinel().to_string()
            }
        }
    }

    /// Raw stored value used for ordering; empty when unassigned.
    pub fn sort_key(&self, entity: &EntityId) -> String {
        match self.service.get_visibility(entity) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event=column_sort module=admin status=error entity={} error={}",
                    entity, err
                );
                String::new()
            }
        }
    }

    /// Orders `entities` by stored value, unassigned first, ties by id.
    pub fn sort(&self, entities: &mut [EntityId]) {
        entities.sort_by_cached_key(|entity| (self.sort_key(entity), entity.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::VisibilityColumn;
    use crate::model::entity::{parse_scope, EntityId};
    use crate::registry::vocabulary::VisibilityRegistry;
    use crate::repo::memory::MemoryMetadataStore;
    use crate::repo::meta_repo::NoopCacheInvalidator;
    use crate::service::visibility_service::VisibilityService;
    use std::sync::Arc;

    #[test]
    fn cell_and_sort_follow_stored_values() {
        let service = VisibilityService::from_parts(
            MemoryMetadataStore::new(),
            NoopCacheInvalidator,
            Arc::new(VisibilityRegistry::default()),
            "—",
        );
        let scope = parse_scope("category").unwrap();
        let a = EntityId::from(1_u64);
        let b = EntityId::from(2_u64);
        let c = EntityId::from(3_u64);
        service.set_visibility(&a, &scope, "public", false).unwrap();
        service.set_visibility(&b, &scope, "hidden", false).unwrap();

        let column = VisibilityColumn::new(&service);
        assert_eq!(column.cell(&a), "Public");
        assert_eq!(column.cell(&c), "—");

        let mut rows = vec![a.clone(), b.clone(), c.clone()];
        column.sort(&mut rows);
        assert_eq!(rows, vec![c, b, a]);
    }

    #[test]
    fn cell_degrades_to_sentinel_on_read_failure() {
        let meta = MemoryMetadataStore::new();
        let service = VisibilityService::from_parts(
            &meta,
            NoopCacheInvalidator,
            Arc::new(VisibilityRegistry::default()),
            "—",
        );
        meta.set_simulate_read_error(true);

        let column = VisibilityColumn::new(&service);
        assert_eq!(column.cell(&EntityId::from(1_u64)), "—");
        assert_eq!(column.sort_key(&EntityId::from(1_u64)), "");
    }
}
