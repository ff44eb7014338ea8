//! Admin-screen adapters.
//!
//! # Responsibility
//! - Shape vocabulary and assignments into select fields and list columns.
//! - Hand render callbacks to the host UI through [`registrar::UiRegistrar`].
//!
//! Markup is produced by the host; this layer only supplies data.

pub mod column;
pub mod fields;
pub mod registrar;
