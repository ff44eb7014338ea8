//! Metadata store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read/write/delete one metadata value by entity id and key.
//! - Verify the `term_meta` table shape before use.
//!
//! # Invariants
//! - Writes are single-statement upserts (last writer wins per key).
//! - Deleting an absent key is not an error.

use crate::db::DbError;
use crate::model::entity::{EntityId, TaxonomyScope};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type MetaResult<T> = Result<T, MetaStoreError>;

/// Failure reported by a metadata store backend.
#[derive(Debug)]
pub enum MetaStoreError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Non-SQL backend failure (remote store, simulated fault, ...).
    Unavailable(String),
}

impl Display for MetaStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::Unavailable(message) => write!(f, "metadata store unavailable: {message}"),
        }
    }
}

impl Error for MetaStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for MetaStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MetaStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value metadata boundary provided by the host environment.
pub trait MetadataStore {
    /// Returns the stored value, or `None` when nothing is recorded.
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>>;
    /// Inserts or replaces one value.
    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()>;
    /// Removes one value. Returns whether a value existed.
    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool>;
}

impl<T: MetadataStore + ?Sized> MetadataStore for &T {
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>> {
        (**self).get_meta(entity, key)
    }

    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()> {
        (**self).set_meta(entity, key, value)
    }

    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool> {
        (**self).delete_meta(entity, key)
    }
}

impl<T: MetadataStore + ?Sized> MetadataStore for Rc<T> {
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>> {
        (**self).get_meta(entity, key)
    }

    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()> {
        (**self).set_meta(entity, key, value)
    }

    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool> {
        (**self).delete_meta(entity, key)
    }
}

/// Failure reported by a downstream cache during invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationError(pub String);

impl Display for InvalidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cache invalidation failed: {}", self.0)
    }
}

impl Error for InvalidationError {}

/// Downstream cache hook called after a write when the caller asks for it.
pub trait CacheInvalidator {
    fn invalidate(&self, entity: &EntityId, scope: &TaxonomyScope)
        -> Result<(), InvalidationError>;
}

impl<T: CacheInvalidator + ?Sized> CacheInvalidator for &T {
    fn invalidate(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
    ) -> Result<(), InvalidationError> {
        (**self).invalidate(entity, scope)
    }
}

impl<T: CacheInvalidator + ?Sized> CacheInvalidator for Rc<T> {
    fn invalidate(
        &self,
        entity: &EntityId,
        scope: &TaxonomyScope,
    ) -> Result<(), InvalidationError> {
        (**self).invalidate(entity, scope)
    }
}

/// Invalidator for hosts without a downstream cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheInvalidator;

impl CacheInvalidator for NoopCacheInvalidator {
    fn invalidate(&self, _: &EntityId, _: &TaxonomyScope) -> Result<(), InvalidationError> {
        Ok(())
    }
}

/// SQLite-backed metadata store over the `term_meta` table.
pub struct SqliteMetadataStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMetadataStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> MetaResult<Self> {
        ensure_meta_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MetadataStore for SqliteMetadataStore<'_> {
    fn get_meta(&self, entity: &EntityId, key: &str) -> MetaResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT meta_value
                 FROM term_meta
                 WHERE entity_id = ?1
                   AND meta_key = ?2;",
                params![entity.as_str(), key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_meta(&self, entity: &EntityId, key: &str, value: &str) -> MetaResult<()> {
        self.conn.execute(
            "INSERT INTO term_meta (entity_id, meta_key, meta_value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (entity_id, meta_key) DO UPDATE SET
                meta_value = excluded.meta_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![entity.as_str(), key, value],
        )?;
        Ok(())
    }

    fn delete_meta(&self, entity: &EntityId, key: &str) -> MetaResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM term_meta WHERE entity_id = ?1 AND meta_key = ?2;",
            params![entity.as_str(), key],
        )?;
        Ok(changed > 0)
    }
}

fn ensure_meta_connection_ready(conn: &Connection) -> MetaResult<()> {
    if !table_exists(conn, "term_meta")? {
        return Err(MetaStoreError::MissingRequiredTable("term_meta"));
    }

    for column in ["entity_id", "meta_key", "meta_value"] {
        if !table_has_column(conn, "term_meta", column)? {
            return Err(MetaStoreError::MissingRequiredColumn {
                table: "term_meta",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> MetaResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> MetaResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
