//! Term visibility core.
//! Assigns one value from an extensible visibility vocabulary to taxonomy
//! entities and renders it back for display.

pub mod admin;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repo;
pub mod service;

pub use admin::column::VisibilityColumn;
pub use admin::fields::{select_options, FieldLabels, SelectOption};
pub use admin::registrar::{register_visibility_ui, ColumnSpec, FieldSpec, UiRegistrar};
pub use config::{ConfigError, CoreConfig, LoggingConfig, OptionConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::entity::{parse_scope, EntityId, EntityIdError, ScopeError, TaxonomyScope};
pub use model::visibility::{
    default_options, VisibilityOption, DEFAULT_SENTINEL, VISIBILITY_META_KEY,
};
pub use registry::vocabulary::{
    options_extension, InvalidOption, RegistryExtension, VisibilityRegistry,
    VisibilityRegistryBuilder,
};
pub use repo::cache::CachedMetadataStore;
pub use repo::memory::MemoryMetadataStore;
pub use repo::meta_repo::{
    CacheInvalidator, InvalidationError, MetaResult, MetaStoreError, MetadataStore,
    NoopCacheInvalidator, SqliteMetadataStore,
};
pub use service::assignment_service::{
    AssignmentChange, AssignmentError, AssignmentStore, CacheOutcome, SetOutcome,
};
pub use service::presentation::PresentationAdapter;
pub use service::visibility_service::{VisibilityService, VisibilityServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
