use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SqlLinkError;
use crate::types::DriverKind;

#[cfg(feature = "postgres")]
use crate::postgres::PostgresHandle;

/// Shared reference to a live driver handle.
///
/// This is the ownership seam of the crate: an owned [`Connection`] holds
/// the only long-lived clone and tears the handle down on disconnect, while
/// an adopted connection holds one clone of a handle whose other clone the
/// caller keeps. Dropping a clone never closes the underlying link for the
/// remaining holders.
///
/// [`Connection`]: crate::connection::Connection
pub type SharedHandle = Arc<Mutex<DriverHandle>>;

/// A live client for one of the supported drivers.
pub enum DriverHandle {
    #[cfg(feature = "mysql")]
    Mysql(mysql_async::Conn),
    #[cfg(feature = "postgres")]
    Postgres(PostgresHandle),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Connection),
}

// Manual Debug implementation because the driver clients don't all
// implement Debug.
impl std::fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<MysqlConn>").finish(),
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").field(&"<PostgresClient>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<SqliteConnection>").finish(),
        }
    }
}

impl DriverHandle {
    #[must_use]
    pub fn driver(&self) -> DriverKind {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => DriverKind::Mysql,
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => DriverKind::Postgres,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => DriverKind::Sqlite,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedHandle {
        Arc::new(Mutex::new(self))
    }

    /// Close the underlying link, best effort. Only called on the owned
    /// teardown path; adopted handles are never passed here.
    pub(crate) async fn close(self) {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => {
                if let Err(e) = conn.disconnect().await {
                    tracing::debug!("mysql graceful disconnect failed: {e}");
                }
            }
            #[cfg(feature = "postgres")]
            Self::Postgres(handle) => handle.shutdown(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => {
                if let Err((_conn, e)) = conn.close() {
                    tracing::debug!("sqlite close failed: {e}");
                }
            }
        }
    }
}

/// The minimal operations this crate needs from a driver client: a
/// liveness probe, statement execution without results (transaction
/// control), a single text scalar (metadata queries), and the server
/// version. Everything else (prepared statements, result mapping) is the
/// business of a query layer working on the raw handle.
#[async_trait]
pub trait DriverOps {
    /// Trivial round-trip verifying the link is still usable.
    ///
    /// # Errors
    /// Returns the driver's error if the link is dead.
    async fn ping(&mut self) -> Result<(), SqlLinkError>;

    /// Execute a statement, discarding any results.
    ///
    /// # Errors
    /// Returns the driver's error if execution fails.
    async fn execute(&mut self, sql: &str) -> Result<(), SqlLinkError>;

    /// First column of the first row, rendered as text; `None` when the
    /// query returns no rows or a NULL.
    ///
    /// # Errors
    /// Returns the driver's error if the query fails.
    async fn query_scalar(&mut self, sql: &str) -> Result<Option<String>, SqlLinkError>;

    /// Version string reported by the driver or server.
    ///
    /// # Errors
    /// Returns the driver's error if introspection fails.
    async fn server_version(&mut self) -> Result<String, SqlLinkError>;
}

#[async_trait]
impl DriverOps for DriverHandle {
    async fn ping(&mut self) -> Result<(), SqlLinkError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::ping(conn).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(handle) => crate::postgres::ping(handle).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::ping(conn),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<(), SqlLinkError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::execute(conn, sql).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(handle) => crate::postgres::execute(handle, sql).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::execute(conn, sql),
        }
    }

    async fn query_scalar(&mut self, sql: &str) -> Result<Option<String>, SqlLinkError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::query_scalar(conn, sql).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(handle) => crate::postgres::query_scalar(handle, sql).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::query_scalar(conn, sql),
        }
    }

    async fn server_version(&mut self) -> Result<String, SqlLinkError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(conn) => crate::mysql::server_version(conn).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(handle) => crate::postgres::server_version(handle).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => Ok(crate::sqlite::server_version()),
        }
    }
}
