//! DuckDB key-value store implementation
//!
//! DuckDB lets one process at a time hold a database file. A file-backed
//! store therefore opens a connection for each operation and closes it
//! again, so a running scoreboard never locks the desk out (or the other
//! way round).

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 7;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, ... 1600ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        // DuckDB's own file lock
        || lower.contains("could not set lock")
        || lower.contains("conflicting lock")
}

fn open_file(db_path: &Path) -> Result<Connection> {
    // Extension autoloading stays off; JSON is statically linked via the
    // "json" Cargo feature
    let config = duckdb::Config::default().enable_autoload_extension(false)?;
    Ok(Connection::open_with_flags(db_path, config)?)
}

/// Open `db_path`, backing off while another process holds it
fn open_with_retry(db_path: &Path) -> Result<Connection> {
    let mut attempt = 0;
    loop {
        match open_file(db_path) {
            Ok(conn) => return Ok(conn),
            Err(e) => {
                let err_msg = e.to_string();
                attempt += 1;
                if !is_retryable_error(&err_msg) || attempt >= MAX_RETRIES {
                    return Err(e);
                }
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt - 1));
                eprintln!(
                    "[halisaha] Database busy, retrying in {}ms (attempt {}/{}): {}",
                    delay.as_millis(),
                    attempt,
                    MAX_RETRIES,
                    err_msg
                );
                thread::sleep(delay);
            }
        }
    }
}

enum Handle {
    /// In-memory databases live exactly as long as their one connection
    Held(Mutex<Connection>),
    /// File databases: a fresh connection per call
    PerCall(PathBuf),
}

/// Key-value store backed by a single DuckDB table (`sys_kv`)
pub struct DuckDbKvStore {
    handle: Handle,
}

impl DuckDbKvStore {
    /// Open (or create) the store at `db_path` and apply pending migrations
    ///
    /// No connection is kept once this returns.
    pub fn open(db_path: &Path) -> Result<Self> {
        let store = Self {
            handle: Handle::PerCall(db_path.to_path_buf()),
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// In-memory DuckDB database, schema included
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let store = Self {
            handle: Handle::Held(Mutex::new(Connection::open_in_memory_with_flags(config)?)),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn with_conn<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        match &self.handle {
            Handle::Held(conn) => {
                let conn = conn.lock().map_err(|e| Error::Lock(e.to_string()))?;
                f(&conn)
            }
            Handle::PerCall(path) => {
                let conn = open_with_retry(path)?;
                f(&conn)
            }
        }
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        self.with_conn(|conn| MigrationService::new(conn).run_pending())
    }
}

impl KeyValueStore for DuckDbKvStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            match conn.query_row(
                "SELECT CAST(value AS VARCHAR) FROM sys_kv WHERE key = ?",
                [key],
                |row| row.get::<_, String>(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        // Timestamps are computed in Rust; ICU is not bundled
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sys_kv (key, value, updated_at) VALUES (?, ?, CAST(? AS TIMESTAMP))
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM sys_kv WHERE key = ?", [key])?;
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM sys_kv ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(keys)
        })
    }
}
