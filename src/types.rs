use clap::ValueEnum;
use std::fmt;

/// The database driver behind a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DriverKind {
    /// MySQL server reached over the network
    #[cfg(feature = "mysql")]
    Mysql,
    /// `PostgreSQL` server reached over the network
    #[cfg(feature = "postgres")]
    Postgres,
    /// Embedded `SQLite` database, in-memory or file-backed
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl DriverKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "mysql")]
            DriverKind::Mysql => "mysql",
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => "postgres",
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => "sqlite",
        }
    }

    /// Whether the driver dials a server, as opposed to opening an
    /// embedded database in-process.
    #[must_use]
    pub fn is_networked(self) -> bool {
        match self {
            #[cfg(feature = "mysql")]
            DriverKind::Mysql => true,
            #[cfg(feature = "postgres")]
            DriverKind::Postgres => true,
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => false,
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
