//! Adoption of externally-owned handles.
//!
//! An adopted handle was dialed by the caller, who keeps its lifetime in
//! hand: this crate may use it but never closes it, and with no credentials
//! it can never re-establish it. The database name is not known up front
//! either, so it is probed from the handle on adoption.

#[cfg(any(feature = "mysql", feature = "postgres"))]
use crate::handle::DriverOps;
use crate::handle::{DriverHandle, SharedHandle};
use crate::types::DriverKind;

/// Database name reported for adopted embedded handles. File-backed and
/// in-memory SQLite databases have no server-side notion of a current
/// database, so no probe is attempted.
pub const EMBEDDED_DATABASE_NAME: &str = ":memory:";

/// Fallback database name when detection cannot produce one.
pub const UNKNOWN_DATABASE_NAME: &str = "unknown";

/// Wrap a caller-owned MySQL connection for adoption. Keep a clone of the
/// returned handle to retain direct access after the [`Connection`] lets
/// go of it.
///
/// [`Connection`]: crate::connection::Connection
#[cfg(feature = "mysql")]
#[must_use]
pub fn adopt_mysql(conn: mysql_async::Conn) -> SharedHandle {
    DriverHandle::Mysql(conn).into_shared()
}

/// Wrap a caller-owned `PostgreSQL` client for adoption. The caller keeps
/// driving the client's connection task.
#[cfg(feature = "postgres")]
#[must_use]
pub fn adopt_postgres(client: tokio_postgres::Client) -> SharedHandle {
    DriverHandle::Postgres(crate::postgres::PostgresHandle::from_client(client)).into_shared()
}

/// Wrap a caller-owned `SQLite` connection for adoption.
#[cfg(feature = "sqlite")]
#[must_use]
pub fn adopt_sqlite(conn: rusqlite::Connection) -> SharedHandle {
    DriverHandle::Sqlite(conn).into_shared()
}

/// Ask the handle which database it currently has selected.
///
/// Advisory only: driver errors, empty results, and NULLs all fold into
/// [`UNKNOWN_DATABASE_NAME`]. Never fails.
pub(crate) async fn detect_database_name(handle: &mut DriverHandle) -> String {
    match handle.driver() {
        #[cfg(feature = "mysql")]
        DriverKind::Mysql => scalar_or_unknown(handle, "SELECT DATABASE()").await,
        #[cfg(feature = "postgres")]
        DriverKind::Postgres => scalar_or_unknown(handle, "SELECT current_database()").await,
        #[cfg(feature = "sqlite")]
        DriverKind::Sqlite => EMBEDDED_DATABASE_NAME.to_string(),
    }
}

#[cfg(any(feature = "mysql", feature = "postgres"))]
async fn scalar_or_unknown(handle: &mut DriverHandle, sql: &str) -> String {
    match handle.query_scalar(sql).await {
        Ok(Some(name)) if !name.is_empty() => name,
        Ok(_) => UNKNOWN_DATABASE_NAME.to_string(),
        Err(e) => {
            tracing::debug!("database name detection failed: {e}");
            UNKNOWN_DATABASE_NAME.to_string()
        }
    }
}
