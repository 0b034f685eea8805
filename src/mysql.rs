use mysql_async::prelude::Queryable;
use serde::{Deserialize, Serialize};

use crate::error::SqlLinkError;

/// Connection settings for a MySQL server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Opt-in connection charset, applied with `SET NAMES` after the dial.
    pub charset: Option<String>,
}

impl MysqlConfig {
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
            charset: None,
        }
    }

    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Canonical connection URL for this config.
    ///
    /// Pure formatting; the same config always yields the same string.
    #[must_use]
    pub fn dsn(&self) -> String {
        let mut dsn = format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        );
        if let Some(charset) = &self.charset {
            dsn.push_str("?charset=");
            dsn.push_str(charset);
        }
        dsn
    }
}

/// Dial a MySQL server from the config's credentials.
///
/// # Errors
/// Returns `SqlLinkError::ConfigError` if required fields are missing or
/// `SqlLinkError::ConnectionError` if the server cannot be reached or
/// rejects the credentials.
pub(crate) async fn dial(cfg: &MysqlConfig) -> Result<mysql_async::Conn, SqlLinkError> {
    if cfg.host.is_empty() {
        return Err(SqlLinkError::ConfigError("host is required".to_string()));
    }
    if cfg.database.is_empty() {
        return Err(SqlLinkError::ConfigError("database is required".to_string()));
    }

    let opts = mysql_async::OptsBuilder::default()
        .ip_or_hostname(cfg.host.clone())
        .tcp_port(cfg.port)
        .user(Some(cfg.user.clone()))
        .pass(Some(cfg.password.clone()))
        .db_name(Some(cfg.database.clone()));

    let mut conn = mysql_async::Conn::new(opts).await.map_err(|e| {
        SqlLinkError::ConnectionError(format!(
            "Failed to connect to MySQL at {}:{}: {e}",
            cfg.host, cfg.port
        ))
    })?;

    // mysql_async pins the URL parameter set, so charset is applied
    // post-dial rather than through the DSN.
    if let Some(charset) = &cfg.charset {
        conn.query_drop(format!("SET NAMES {charset}")).await?;
    }

    Ok(conn)
}

pub(crate) async fn ping(conn: &mut mysql_async::Conn) -> Result<(), SqlLinkError> {
    conn.ping().await?;
    Ok(())
}

pub(crate) async fn execute(conn: &mut mysql_async::Conn, sql: &str) -> Result<(), SqlLinkError> {
    conn.query_drop(sql).await?;
    Ok(())
}

pub(crate) async fn query_scalar(
    conn: &mut mysql_async::Conn,
    sql: &str,
) -> Result<Option<String>, SqlLinkError> {
    let value: Option<Option<String>> = conn.query_first(sql).await?;
    Ok(value.flatten())
}

pub(crate) async fn server_version(conn: &mut mysql_async::Conn) -> Result<String, SqlLinkError> {
    query_scalar(conn, "SELECT VERSION()")
        .await?
        .ok_or_else(|| SqlLinkError::ConnectionError("server returned no version".to_string()))
}

#[cfg(test)]
mod tests {
    use super::MysqlConfig;

    #[test]
    fn dsn_includes_charset_only_when_set() {
        let cfg = MysqlConfig::new("localhost", 3306, "app", "pw", "orders");
        assert_eq!(cfg.dsn(), "mysql://app:pw@localhost:3306/orders");

        let cfg = cfg.with_charset("utf8mb4");
        assert_eq!(cfg.dsn(), "mysql://app:pw@localhost:3306/orders?charset=utf8mb4");
    }
}
