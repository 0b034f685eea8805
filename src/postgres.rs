use serde::{Deserialize, Serialize};
use tokio_postgres::{NoTls, SimpleQueryMessage};

use crate::error::SqlLinkError;

/// Connection settings for a `PostgreSQL` server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl PostgresConfig {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// libpq-style keyword/value DSN, consumed verbatim by
    /// `tokio_postgres::connect`.
    ///
    /// Pure formatting; the same config always yields the same string.
    #[must_use]
    pub fn dsn(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.database
        )
    }
}

/// A `tokio_postgres` client together with the connection task that
/// drives its socket.
///
/// For adopted clients the caller already spawned (and keeps driving)
/// the connection task, so no task handle is held here.
pub struct PostgresHandle {
    client: tokio_postgres::Client,
    driver_task: Option<tokio::task::JoinHandle<()>>,
}

impl PostgresHandle {
    #[must_use]
    pub fn new(client: tokio_postgres::Client, driver_task: tokio::task::JoinHandle<()>) -> Self {
        Self {
            client,
            driver_task: Some(driver_task),
        }
    }

    /// Wrap an already-running client whose connection task the caller drives.
    #[must_use]
    pub fn from_client(client: tokio_postgres::Client) -> Self {
        Self {
            client,
            driver_task: None,
        }
    }

    #[must_use]
    pub fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }

    /// Drop the client and stop the connection task, if we spawned one.
    pub(crate) fn shutdown(self) {
        let Self {
            client,
            driver_task,
        } = self;
        drop(client);
        if let Some(task) = driver_task {
            task.abort();
        }
    }
}

/// Dial a `PostgreSQL` server from the config's DSN and spawn the
/// connection task.
///
/// # Errors
/// Returns `SqlLinkError::ConfigError` if required fields are missing or
/// `SqlLinkError::ConnectionError` if the server cannot be reached or
/// rejects the credentials.
pub(crate) async fn dial(cfg: &PostgresConfig) -> Result<PostgresHandle, SqlLinkError> {
    if cfg.host.is_empty() {
        return Err(SqlLinkError::ConfigError("host is required".to_string()));
    }
    if cfg.database.is_empty() {
        return Err(SqlLinkError::ConfigError("database is required".to_string()));
    }

    let (client, connection) = tokio_postgres::connect(&cfg.dsn(), NoTls)
        .await
        .map_err(|e| {
            SqlLinkError::ConnectionError(format!(
                "Failed to connect to PostgreSQL at {}:{}: {e}",
                cfg.host, cfg.port
            ))
        })?;

    let driver_task = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("postgres connection task ended with error: {e}");
        }
    });

    Ok(PostgresHandle::new(client, driver_task))
}

pub(crate) async fn ping(handle: &PostgresHandle) -> Result<(), SqlLinkError> {
    handle.client.simple_query("SELECT 1").await?;
    Ok(())
}

pub(crate) async fn execute(handle: &PostgresHandle, sql: &str) -> Result<(), SqlLinkError> {
    handle.client.batch_execute(sql).await?;
    Ok(())
}

pub(crate) async fn query_scalar(
    handle: &PostgresHandle,
    sql: &str,
) -> Result<Option<String>, SqlLinkError> {
    let messages = handle.client.simple_query(sql).await?;
    for message in messages {
        if let SimpleQueryMessage::Row(row) = message {
            return Ok(row.try_get(0)?.map(ToOwned::to_owned));
        }
    }
    Ok(None)
}

pub(crate) async fn server_version(handle: &PostgresHandle) -> Result<String, SqlLinkError> {
    query_scalar(handle, "SHOW server_version")
        .await?
        .ok_or_else(|| SqlLinkError::ConnectionError("server returned no version".to_string()))
}
