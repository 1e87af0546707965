use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement};

use crate::config::DatabaseConfig;
use crate::constants::{LOG_CONNECTED, LOG_CONNECTION_CLOSED};

/// Database handle shared by repositories
///
/// The connection lives behind an [`Arc`]; cloning a `Storage` or handing
/// [`Storage::shared`] to a repository shares the same pool.
#[derive(Clone)]
pub struct Storage {
    conn: Arc<DatabaseConnection>,
}

impl Storage {
    /// Open a connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let (max_connections, min_connections) = config.pool_bounds();
        if max_connections != config.max_connections {
            log::debug!("In-memory SQLite database, pool limited to one connection");
        }

        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(config.sqlx_logging)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let conn = Database::connect(options).await?;
        log::info!("{} ({:?})", LOG_CONNECTED, conn.get_database_backend());

        Ok(Self::from_connection(conn))
    }

    /// Single-connection in-memory SQLite database
    pub async fn in_memory() -> Result<Self, DbErr> {
        Self::connect(&DatabaseConfig::with_url("sqlite::memory:")).await
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { conn: conn.into() }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Another handle to the same connection, for repositories
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    pub fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    /// Check that the database answers
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }

    /// Execute raw SQL without parameters
    pub async fn execute_unprepared(&self, sql: &str) -> Result<u64, DbErr> {
        Ok(self.conn.execute_unprepared(sql).await?.rows_affected())
    }

    /// Build a statement for this connection's backend
    pub fn statement(&self, sql: impl Into<String>) -> Statement {
        Statement::from_string(self.backend(), sql)
    }

    /// Close the connection pool
    ///
    /// While other handles still share the pool this only drops this handle;
    /// the last owner closes it.
    pub async fn close(self) -> Result<(), DbErr> {
        close_shared(self.conn).await
    }
}

/// Close `conn` if this is the last handle to it.
pub(crate) async fn close_shared(conn: Arc<DatabaseConnection>) -> Result<(), DbErr> {
    match Arc::try_unwrap(conn) {
        Ok(conn) => {
            conn.close().await?;
            log::info!("{}", LOG_CONNECTION_CLOSED);
        }
        Err(shared) => {
            log::debug!(
                "Connection still shared by {} handle(s), leaving it open",
                Arc::strong_count(&shared) - 1
            );
        }
    }
    Ok(())
}
