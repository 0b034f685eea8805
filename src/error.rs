use thiserror::Error;

#[cfg(feature = "mysql")]
use mysql_async;
#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

#[derive(Debug, Error)]
pub enum SqlLinkError {
    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid transaction state: {0}")]
    StateError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("External connection is dead: {0}")]
    DeadExternalConnection(String),
}
