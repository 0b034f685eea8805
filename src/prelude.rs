//! Convenient imports for common functionality.

pub use crate::config::DbConfig;
pub use crate::connection::Connection;
pub use crate::error::SqlLinkError;
pub use crate::external::{EMBEDDED_DATABASE_NAME, UNKNOWN_DATABASE_NAME};
pub use crate::handle::{DriverHandle, DriverOps, SharedHandle};
pub use crate::types::DriverKind;

#[cfg(feature = "mysql")]
pub use crate::external::adopt_mysql;
#[cfg(feature = "mysql")]
pub use crate::mysql::MysqlConfig;

#[cfg(feature = "postgres")]
pub use crate::external::adopt_postgres;
#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresConfig, PostgresHandle};

#[cfg(feature = "sqlite")]
pub use crate::external::adopt_sqlite;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConfig;
