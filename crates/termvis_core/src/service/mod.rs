//! Visibility use-case services.
//!
//! # Responsibility
//! - Orchestrate metadata store calls into assignment semantics.
//! - Keep host/UI layers decoupled from storage details.

pub mod assignment_service;
pub mod presentation;
pub mod visibility_service;
