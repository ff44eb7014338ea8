//! Metadata persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value metadata boundary the assignment store writes to.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - One `(entity_id, meta_key)` pair holds at most one value.
//! - Single-key writes are atomic; there are no multi-entity transactions.

pub mod cache;
pub mod memory;
pub mod meta_repo;
