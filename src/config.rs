use serde::{Deserialize, Serialize};

use crate::error::SqlLinkError;
use crate::handle::DriverHandle;
use crate::types::DriverKind;

#[cfg(feature = "mysql")]
use crate::mysql::MysqlConfig;
#[cfg(feature = "postgres")]
use crate::postgres::PostgresConfig;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConfig;

/// Configuration for a connection this crate dials itself.
///
/// Immutable once constructed; build a new value to point at a different
/// target. Adopted connections carry no config, since the caller already
/// dialed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DbConfig {
    #[cfg(feature = "mysql")]
    Mysql(MysqlConfig),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConfig),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConfig),
}

impl DbConfig {
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

    /// Driver-specific connection string. Deterministic: the same config
    /// always formats to the identical string, with no I/O involved.
    #[must_use]
    pub fn dsn(&self) -> String {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(cfg) => cfg.dsn(),
            #[cfg(feature = "postgres")]
            Self::Postgres(cfg) => cfg.dsn(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(cfg) => cfg.dsn(),
        }
    }

    /// The database this config targets: the configured database name for
    /// server drivers, the file path for `SQLite`.
    #[must_use]
    pub fn database_name(&self) -> String {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(cfg) => cfg.database.clone(),
            #[cfg(feature = "postgres")]
            Self::Postgres(cfg) => cfg.database.clone(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(cfg) => cfg.path.clone(),
        }
    }

    /// Establish a fresh handle from this config's credentials.
    ///
    /// # Errors
    /// Returns `SqlLinkError::ConnectionError` if the dial fails.
    pub(crate) async fn dial(&self) -> Result<DriverHandle, SqlLinkError> {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(cfg) => Ok(DriverHandle::Mysql(crate::mysql::dial(cfg).await?)),
            #[cfg(feature = "postgres")]
            Self::Postgres(cfg) => Ok(DriverHandle::Postgres(crate::postgres::dial(cfg).await?)),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(cfg) => Ok(DriverHandle::Sqlite(crate::sqlite::open(cfg)?)),
        }
    }
}
