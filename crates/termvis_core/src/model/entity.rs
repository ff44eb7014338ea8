//! Entity and scope identifiers.
//!
//! # Responsibility
//! - Normalize host identifiers (integers, strings, UUIDs) into one key shape.
//! - Validate taxonomy scope keys at the boundary.
//!
//! # Invariants
//! - `EntityId` is never blank.
//! - `TaxonomyScope` always matches the lowercase taxonomy-key shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static SCOPE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_\-]{1,32}$").expect("valid scope key regex"));

/// Opaque identifier of the classified entity (a taxonomy term in most hosts).
///
/// Stored in canonical string form so integer ids and string ids share the
/// same metadata key space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Parses a host-provided id. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self, EntityIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EntityIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<Uuid> for EntityId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

/// Entity id parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityIdError {
    Empty,
}

impl Display for EntityIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "entity id must not be empty"),
        }
    }
}

impl Error for EntityIdError {}

/// Namespace qualifier of an entity, e.g. `category` or `post_tag`.
///
/// Advisory: the stored visibility is keyed by entity id alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxonomyScope(String);

impl TaxonomyScope {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaxonomyScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaxonomyScope {
    type Error = ScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_scope(&value)
    }
}

impl TryFrom<&str> for TaxonomyScope {
    type Error = ScopeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse_scope(value)
    }
}

impl From<TaxonomyScope> for String {
    fn from(value: TaxonomyScope) -> Self {
        value.0
    }
}

/// Parses one taxonomy scope key.
pub fn parse_scope(value: &str) -> Result<TaxonomyScope, ScopeError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ScopeError::Empty);
    }
    if !SCOPE_KEY_RE.is_match(normalized) {
        return Err(ScopeError::InvalidKey(normalized.to_string()));
    }
    Ok(TaxonomyScope(normalized.to_string()))
}

/// Scope parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    Empty,
    InvalidKey(String),
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "taxonomy scope must not be empty"),
            Self::InvalidKey(value) => write!(f, "taxonomy scope key is invalid: {value}"),
        }
    }
}

impl Error for ScopeError {}

#[cfg(test)]
mod tests {
    use super::{parse_scope, EntityId, EntityIdError, ScopeError};
    use uuid::Uuid;

    #[test]
    fn integer_and_string_ids_share_canonical_form() {
        assert_eq!(EntityId::from(42_u64), EntityId::parse(" 42 ").unwrap());
        assert_eq!(EntityId::from(42_i64).as_str(), "42");
    }

    #[test]
    fn uuid_ids_use_hyphenated_form() {
        let uuid = Uuid::new_v4();
        assert_eq!(EntityId::from(uuid).as_str(), uuid.to_string());
    }

    #[test]
    fn rejects_blank_entity_id() {
        assert_eq!(EntityId::parse("   "), Err(EntityIdError::Empty));
    }

    #[test]
    fn parses_taxonomy_keys() {
        assert_eq!(parse_scope("post_tag").unwrap().as_str(), "post_tag");
        assert_eq!(parse_scope(" category ").unwrap().as_str(), "category");
    }

    #[test]
    fn rejects_invalid_scope_keys() {
        assert_eq!(parse_scope(""), Err(ScopeError::Empty));
        assert_eq!(
            parse_scope("Post Tag"),
            Err(ScopeError::InvalidKey("Post Tag".to_string()))
        );
    }
}
