use rusqlite::OptionalExtension;
use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};

use crate::error::SqlLinkError;

/// Settings for an embedded `SQLite` database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:` for a transient database.
    pub path: String,
}

impl SqliteConfig {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Pure formatting; the same config always yields the same string.
    #[must_use]
    pub fn dsn(&self) -> String {
        format!("sqlite://{}", self.path)
    }
}

/// Open the database file named by the config.
///
/// # Errors
/// Returns `SqlLinkError::ConfigError` if the path is empty or
/// `SqlLinkError::ConnectionError` if the file cannot be opened or
/// created.
pub(crate) fn open(cfg: &SqliteConfig) -> Result<rusqlite::Connection, SqlLinkError> {
    if cfg.path.is_empty() {
        return Err(SqlLinkError::ConfigError("path is required".to_string()));
    }
    rusqlite::Connection::open(&cfg.path).map_err(|e| {
        SqlLinkError::ConnectionError(format!("Failed to open SQLite database {}: {e}", cfg.path))
    })
}

// SQLite calls are in-process and cheap; they run inline rather than on a
// blocking thread.

pub(crate) fn ping(conn: &rusqlite::Connection) -> Result<(), SqlLinkError> {
    conn.query_row("SELECT 1", [], |_| Ok(()))?;
    Ok(())
}

pub(crate) fn execute(conn: &rusqlite::Connection, sql: &str) -> Result<(), SqlLinkError> {
    conn.execute_batch(sql)?;
    Ok(())
}

pub(crate) fn query_scalar(
    conn: &rusqlite::Connection,
    sql: &str,
) -> Result<Option<String>, SqlLinkError> {
    let value = conn
        .query_row(sql, [], |row| {
            Ok(match row.get_ref(0)? {
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                ValueRef::Blob(_) => None,
            })
        })
        .optional()?;
    Ok(value.flatten())
}

pub(crate) fn server_version() -> String {
    rusqlite::version().to_string()
}
