//! Database handle for the Campus Hub server.
//!
//! Wraps a sqlx SQLite pool behind a small `DbHandle` with typed connect
//! options. The portal standardizes on SQLite; in-memory databases
//! (`sqlite::memory:`) are supported for tests and `--mock` runs.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid database DSN '{dsn}': {message}")]
    InvalidDsn { dsn: String, message: String },

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Typed connection options for `DbHandle::connect`.
#[derive(Debug, Clone)]
pub struct ConnectOpts {
    /// Maximum pool size.
    pub max_conns: Option<u32>,
    /// How long to wait for a free connection.
    pub acquire_timeout: Option<Duration>,
    /// SQLite busy timeout (maps to PRAGMA busy_timeout).
    pub sqlite_busy_timeout: Option<Duration>,
    /// Create parent directories for file-backed databases.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            acquire_timeout: Some(Duration::from_secs(5)),
            sqlite_busy_timeout: Some(Duration::from_millis(5000)),
            create_sqlite_dirs: true,
        }
    }
}

/// Owned database pool with its source DSN.
#[derive(Debug, Clone)]
pub struct DbHandle {
    pool: SqlitePool,
    dsn: String,
}

impl DbHandle {
    /// Connect to the database described by `dsn`.
    ///
    /// Accepts `sqlite://<path>` and `sqlite::memory:` forms. The database
    /// file is created when missing.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        if opts.create_sqlite_dirs {
            if let Some(dir) = file_parent_dir(dsn) {
                std::fs::create_dir_all(&dir).map_err(|e| DbError::InvalidDsn {
                    dsn: dsn.to_string(),
                    message: format!("cannot create parent directory: {e}"),
                })?;
            }
        }

        let mut conn_opts =
            SqliteConnectOptions::from_str(dsn).map_err(|e| DbError::InvalidDsn {
                dsn: dsn.to_string(),
                message: e.to_string(),
            })?;
        conn_opts = conn_opts.create_if_missing(true);
        if let Some(busy) = opts.sqlite_busy_timeout {
            conn_opts = conn_opts.busy_timeout(busy);
        }

        let mut pool_opts = SqlitePoolOptions::new();
        if let Some(max) = opts.max_conns {
            pool_opts = pool_opts.max_connections(max);
        }
        if let Some(timeout) = opts.acquire_timeout {
            pool_opts = pool_opts.acquire_timeout(timeout);
        }

        let pool = pool_opts.connect_with(conn_opts).await?;
        tracing::debug!(dsn = %dsn, "database pool established");

        Ok(Self {
            pool,
            dsn: dsn.to_string(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Parent directory of a file-backed sqlite DSN, if any.
fn file_parent_dir(dsn: &str) -> Option<std::path::PathBuf> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return None;
    }
    let path = dsn.strip_prefix("sqlite://").or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path).parent().map(|p| p.to_path_buf()).filter(|p| !p.as_os_str().is_empty())
}
