//! In-process metadata store.
//!
//! Uses `RefCell` for interior mutability; the service is single-threaded by
//! contract, so `&self` methods can mutate without locking.

use crate::model::entity::EntityId;
use crate::repo::meta_repo::{MetaResult, MetaStoreError, MetadataStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// `HashMap`-backed metadata store for tests and embedded hosts.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    values: RefCell<HashMap<(EntityId, String), String>>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail with `Unavailable`.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Makes every subsequent write or delete fail with `Unavailable`.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of stored `(entity, key)` pairs.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    fn check_write(&self) -> MetaResult<()> {
        if self.simulate_write_error.get() {
            return Err(MetaStoreError::Unavailable(
                "simulated write error".to_string(),
            ));
        }
        Ok(())
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(MetaStoreError::Unavailable(
                "simulated read error".to_string(),
            ));
        }
        Ok(self
            .values
            .borrow()
            .get(&(entity.clone(), key.to_string()))
            .cloned())
    }

    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()> {
        self.check_write()?;
        self.values
            .borrow_mut()
            .insert((entity.clone(), key.to_string()), value.to_string());
        Ok(())
    }

    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool> {
        self.check_write()?;
        Ok(self
            .values
            .borrow_mut()
            .remove(&(entity.clone(), key.to_string()))
            .is_some())
    }
}
