//! Domain model for visibility classification.
//!
//! # Responsibility
//! - Define identifiers for classified entities and their namespaces.
//! - Define the vocabulary entry shape shared by registry and adapters.
//!
//! # Invariants
//! - Entity ids are opaque and compared by canonical string form.
//! - Scope never partitions stored values; it only qualifies cache calls.

pub mod entity;
pub mod visibility;
