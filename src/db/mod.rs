//! Database module for noticeboard.
//!
//! Wraps the sqlx pool handle that every repository borrows. The schema of
//! `notice_board` and `stdinfo` is owned externally; nothing here creates or
//! migrates tables.

mod row;
#[cfg(all(test, feature = "sqlite"))]
pub(crate) mod test_support;
mod value;

pub use row::row_to_json;
pub(crate) use value::bind_value;
pub use value::SqlValue;

#[cfg(feature = "sqlite")]
use std::path::Path;
#[cfg(feature = "sqlite")]
use std::str::FromStr;

#[cfg(feature = "mysql")]
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::{NoticeBoardError, Result};

/// Connection pool type for the enabled backend.
#[cfg(feature = "sqlite")]
pub type DbPool = sqlx::SqlitePool;

/// Connection pool type for the enabled backend.
#[cfg(feature = "mysql")]
pub type DbPool = sqlx::MySqlPool;

/// Database driver for the enabled backend.
#[cfg(feature = "sqlite")]
pub type Db = sqlx::Sqlite;

/// Database driver for the enabled backend.
#[cfg(feature = "mysql")]
pub type Db = sqlx::MySql;

/// Row type for the enabled backend.
pub type DbRow = <Db as sqlx::Database>::Row;

/// Owned database handle, cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect to the configured database, failing if it is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to {} database", Self::backend_name());

        let pool = Self::pool_options(config)
            .connect_with(Self::connect_options(config)?)
            .await
            .map_err(|e| NoticeBoardError::DatabaseConnection(e.to_string()))?;

        info!("Connected to the database");
        Ok(Self { pool })
    }

    /// Create a pool that connects on first use.
    ///
    /// Used after a failed [`Database::connect`] so the server still starts;
    /// each query then fails individually until the database is reachable.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        let pool = Self::pool_options(config).connect_lazy_with(Self::connect_options(config)?);
        Ok(Self { pool })
    }

    /// Open an in-memory SQLite database for testing.
    ///
    /// The pool is limited to one connection that is never recycled, since
    /// every SQLite in-memory connection is a separate database.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| NoticeBoardError::DatabaseConnection(e.to_string()))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| NoticeBoardError::DatabaseConnection(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Name of the compiled-in backend.
    #[cfg(feature = "sqlite")]
    pub fn backend_name() -> &'static str {
        "sqlite"
    }

    /// Name of the compiled-in backend.
    #[cfg(feature = "mysql")]
    pub fn backend_name() -> &'static str {
        "mysql"
    }

    #[cfg(feature = "sqlite")]
    fn pool_options(config: &DatabaseConfig) -> SqlitePoolOptions {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    }

    #[cfg(feature = "mysql")]
    fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
        MySqlPoolOptions::new().max_connections(config.max_connections.max(1))
    }

    #[cfg(feature = "sqlite")]
    fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
        let path = Path::new(&config.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("SQLite database at {:?}", path);

        Ok(SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true))
    }

    #[cfg(feature = "mysql")]
    fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions> {
        debug!(
            host = %config.host,
            port = config.port,
            user = %config.user,
            database = %config.name,
            "MySQL connection options"
        );

        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.name);
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }
        Ok(options)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &Self::backend_name())
            .finish()
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        db.ping().await.unwrap();
        assert_eq!(Database::backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_in_memory_state_is_shared_across_queries() {
        let db = Database::open_in_memory().await.unwrap();

        sqlx::query("CREATE TABLE t (v INTEGER)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (?)")
            .bind(7_i64)
            .execute(db.pool())
            .await
            .unwrap();

        let (v,): (i64,) = sqlx::query_as("SELECT v FROM t")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(v, 7);
    }

    #[tokio::test]
    async fn test_connect_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir
                .path()
                .join("nested/board.db")
                .to_string_lossy()
                .into_owned(),
            ..Default::default()
        };

        {
            let db = Database::connect(&config).await.unwrap();
            sqlx::query("CREATE TABLE t (v INTEGER)")
                .execute(db.pool())
                .await
                .unwrap();
            db.close().await;
        }

        // Reopen and see the table persisted
        let db = Database::connect(&config).await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='t'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_connect_lazy_defers_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory is not a valid database file, so the first query fails.
        let config = DatabaseConfig {
            path: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };

        let db = Database::connect_lazy(&config).unwrap();
        assert!(db.ping().await.is_err());
    }
}
