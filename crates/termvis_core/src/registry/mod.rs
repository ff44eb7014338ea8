//! Visibility vocabulary registry.
//!
//! # Responsibility
//! - Build the ordered option set once from defaults plus explicit extensions.
//! - Resolve option ids to labels with a sentinel fallback.
//!
//! # Invariants
//! - The registry is immutable after `build()`; there is no ambient mutation.
//! - Option ids are unique; for duplicates the later label wins and the
//!   option keeps the position of its first occurrence.

pub mod vocabulary;
