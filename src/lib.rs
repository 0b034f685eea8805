//! Lightweight async connection-lifecycle wrappers for `mysql_async`,
//! `tokio-postgres`, and `rusqlite`.
//!
//! One [`Connection`] type presents the same contract (connect,
//! disconnect, reconnect, transaction control, metadata) across the
//! supported drivers, and can also adopt an already-open handle the caller
//! owns. Adopted connections differ in one fundamental way: with no
//! credentials on hand, `reconnect` can only probe whether the existing
//! link is still alive, never re-dial it.
//!
//! Queries are out of scope; the raw driver handle is exposed through
//! [`Connection::handle`] for whatever query layer sits on top.
//!
//! ```no_run
//! use sql_link::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlLinkError> {
//! let config = DbConfig::Sqlite(SqliteConfig::new("app.db"));
//! let mut conn = Connection::open(config).await?;
//! conn.begin_transaction().await?;
//! conn.commit().await?;
//! conn.disconnect().await;
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "mysql", feature = "postgres", feature = "sqlite")))]
compile_error!("at least one backend feature (mysql, postgres, sqlite) must be enabled");

pub mod config;
pub mod connection;
pub mod error;
pub mod external;
pub mod handle;
pub mod prelude;
pub mod types;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the driver crates so callers can work with the raw handles
// without pinning their own copies.
#[cfg(feature = "mysql")]
pub use mysql_async;
#[cfg(feature = "sqlite")]
pub use rusqlite;
#[cfg(feature = "postgres")]
pub use tokio_postgres;

pub use config::DbConfig;
pub use connection::Connection;
pub use error::SqlLinkError;
pub use handle::{DriverHandle, DriverOps, SharedHandle};
pub use types::DriverKind;
