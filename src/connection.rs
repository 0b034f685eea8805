//! The connection state machine shared by every driver.
//!
//! A [`Connection`] is either `Disconnected` (`handle` is `None`) or
//! `Connected`, with an in-transaction flag layered on the connected
//! state. What varies between drivers lives behind [`DbConfig`] and
//! [`DriverHandle`]; what varies between owned and adopted connections is
//! captured by the ownership value, not by separate connection types.

use std::sync::Arc;

use crate::config::DbConfig;
use crate::error::SqlLinkError;
use crate::external;
use crate::handle::{DriverOps, SharedHandle};
use crate::types::DriverKind;

/// Who controls the lifetime of the underlying handle.
#[derive(Debug)]
enum Ownership {
    /// Dialed by this crate from credentials; teardown is ours, and the
    /// retained config allows a full re-dial.
    Owned(DbConfig),
    /// Adopted from the caller. No credentials, no DSN, never closed here.
    Adopted,
}

/// One logical database link with uniform lifecycle operations.
#[derive(Debug)]
pub struct Connection {
    handle: Option<SharedHandle>,
    ownership: Ownership,
    driver: DriverKind,
    database_name: String,
    in_transaction: bool,
}

impl Connection {
    /// Dial a new owned connection from `config`.
    ///
    /// # Errors
    /// Returns `SqlLinkError::ConnectionError` if the dial fails; the
    /// config is consumed either way.
    pub async fn open(config: DbConfig) -> Result<Self, SqlLinkError> {
        let handle = config.dial().await?;
        let driver = handle.driver();
        let database_name = config.database_name();
        tracing::debug!(driver = driver.as_str(), database = %database_name, "connected");
        Ok(Self {
            handle: Some(handle.into_shared()),
            ownership: Ownership::Owned(config),
            driver,
            database_name,
            in_transaction: false,
        })
    }

    /// Adopt an already-open handle owned by the caller.
    ///
    /// The database name is probed from the handle; probe failures fold
    /// into the `"unknown"` fallback, so adoption itself never fails. The
    /// caller should keep its own clone of `handle` if it wants direct
    /// access after this connection lets go.
    pub async fn adopt(handle: SharedHandle) -> Self {
        let (driver, database_name) = {
            let mut guard = handle.lock().await;
            let driver = guard.driver();
            let name = external::detect_database_name(&mut guard).await;
            (driver, name)
        };
        tracing::debug!(driver = driver.as_str(), database = %database_name, "adopted");
        Self {
            handle: Some(handle),
            ownership: Ownership::Adopted,
            driver,
            database_name,
            in_transaction: false,
        }
    }

    /// Bring a disconnected connection back up. A no-op when already
    /// connected.
    ///
    /// # Errors
    /// Owned: `SqlLinkError::ConnectionError` if the re-dial fails.
    /// Adopted: always `SqlLinkError::DeadExternalConnection`; there are
    /// no credentials to dial with, and only the caller can supply a
    /// fresh handle.
    pub async fn connect(&mut self) -> Result<(), SqlLinkError> {
        if self.handle.is_some() {
            return Ok(());
        }
        match &self.ownership {
            Ownership::Owned(config) => {
                let handle = config.dial().await?;
                tracing::debug!(driver = self.driver.as_str(), "reconnected");
                self.handle = Some(handle.into_shared());
                self.in_transaction = false;
                Ok(())
            }
            Ownership::Adopted => Err(SqlLinkError::DeadExternalConnection(
                "no credentials available to re-establish an adopted connection".to_string(),
            )),
        }
    }

    /// Drop into the disconnected state. Never fails; teardown of owned
    /// handles is best effort, and adopted handles are only let go of,
    /// never closed.
    pub async fn disconnect(&mut self) {
        self.in_transaction = false;
        let Some(shared) = self.handle.take() else {
            return;
        };
        match self.ownership {
            Ownership::Owned(_) => match Arc::try_unwrap(shared) {
                Ok(mutex) => {
                    mutex.into_inner().close().await;
                    tracing::debug!(driver = self.driver.as_str(), "disconnected");
                }
                Err(_) => {
                    // A raw-handle accessor clone is still out there; the
                    // link closes when the last clone drops.
                    tracing::debug!(
                        driver = self.driver.as_str(),
                        "handle still referenced; dropped local reference only"
                    );
                }
            },
            Ownership::Adopted => {
                tracing::debug!(driver = self.driver.as_str(), "released adopted handle");
            }
        }
    }

    /// Re-establish the link.
    ///
    /// Owned connections tear down whatever exists and dial fresh from the
    /// retained config. Adopted connections can only probe the existing
    /// handle: a live probe makes this a no-op, anything else is
    /// unrecoverable from here.
    ///
    /// # Errors
    /// Owned: `SqlLinkError::ConnectionError` on re-dial failure.
    /// Adopted: `SqlLinkError::DeadExternalConnection` when the probe
    /// fails or the handle was already released.
    pub async fn reconnect(&mut self) -> Result<(), SqlLinkError> {
        match &self.ownership {
            Ownership::Owned(_) => {
                self.disconnect().await;
                self.connect().await
            }
            Ownership::Adopted => {
                let Some(shared) = &self.handle else {
                    return Err(SqlLinkError::DeadExternalConnection(
                        "adopted handle was already released".to_string(),
                    ));
                };
                let mut guard = shared.lock().await;
                guard.ping().await.map_err(|e| {
                    SqlLinkError::DeadExternalConnection(format!("liveness probe failed: {e}"))
                })
            }
        }
    }

    /// Live liveness check: a trivial round-trip, not a cached flag. The
    /// link can die silently under us, so `true` only means it was alive a
    /// moment ago.
    pub async fn is_connected(&self) -> bool {
        let Some(shared) = &self.handle else {
            return false;
        };
        shared.lock().await.ping().await.is_ok()
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Start a transaction via the driver's own `BEGIN`.
    ///
    /// # Errors
    /// `SqlLinkError::StateError` if a transaction is already open,
    /// `SqlLinkError::ConnectionError` if disconnected, or the driver's
    /// error if `BEGIN` itself fails.
    pub async fn begin_transaction(&mut self) -> Result<(), SqlLinkError> {
        if self.in_transaction {
            return Err(SqlLinkError::StateError(
                "transaction already in progress".to_string(),
            ));
        }
        self.execute_on_handle("BEGIN").await?;
        self.in_transaction = true;
        Ok(())
    }

    /// # Errors
    /// `SqlLinkError::StateError` if no transaction is open, or the
    /// driver's error if `COMMIT` fails.
    pub async fn commit(&mut self) -> Result<(), SqlLinkError> {
        if !self.in_transaction {
            return Err(SqlLinkError::StateError(
                "no transaction in progress".to_string(),
            ));
        }
        self.execute_on_handle("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    /// # Errors
    /// `SqlLinkError::StateError` if no transaction is open, or the
    /// driver's error if `ROLLBACK` fails.
    pub async fn rollback(&mut self) -> Result<(), SqlLinkError> {
        if !self.in_transaction {
            return Err(SqlLinkError::StateError(
                "no transaction in progress".to_string(),
            ));
        }
        self.execute_on_handle("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }

    /// # Errors
    /// `SqlLinkError::ConnectionError` when disconnected.
    pub fn driver(&self) -> Result<DriverKind, SqlLinkError> {
        if self.handle.is_none() {
            return Err(SqlLinkError::ConnectionError("not connected".to_string()));
        }
        Ok(self.driver)
    }

    /// Version reported by the server (or the embedded library).
    ///
    /// # Errors
    /// `SqlLinkError::ConnectionError` when disconnected, or the driver's
    /// error if introspection fails.
    pub async fn server_version(&self) -> Result<String, SqlLinkError> {
        let shared = self
            .handle
            .as_ref()
            .ok_or_else(|| SqlLinkError::ConnectionError("not connected".to_string()))?;
        shared.lock().await.server_version().await
    }

    /// The database name resolved at construction. Available in every
    /// state; no probe is issued.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// DSN this connection was (or would be) dialed with.
    ///
    /// # Errors
    /// `SqlLinkError::Unsupported` for adopted connections, in every
    /// state: the caller dialed them, so no DSN exists here.
    pub fn dsn(&self) -> Result<String, SqlLinkError> {
        match &self.ownership {
            Ownership::Owned(config) => Ok(config.dsn()),
            Ownership::Adopted => Err(SqlLinkError::Unsupported(
                "no DSN exists for an adopted connection; the caller dialed it".to_string(),
            )),
        }
    }

    /// Raw handle for direct query execution by a collaborating layer.
    /// `None` when disconnected.
    #[must_use]
    pub fn handle(&self) -> Option<SharedHandle> {
        self.handle.clone()
    }

    async fn execute_on_handle(&self, sql: &str) -> Result<(), SqlLinkError> {
        let shared = self
            .handle
            .as_ref()
            .ok_or_else(|| SqlLinkError::ConnectionError("not connected".to_string()))?;
        shared.lock().await.execute(sql).await
    }
}
