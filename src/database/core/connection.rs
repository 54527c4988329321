//! Database connection management
//!
//! `DatabaseManager` owns the single SQLite connection used by the whole
//! persistence layer. It is an explicit handle held by the host application
//! rather than process-wide state.

use crate::database::core::sink::DiagnosticSink;
use crate::database::error::DbError;
use rusqlite::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Lazily opened, reusable connection to one database file
///
/// The connection is opened on first use and kept until it is closed
/// explicitly, the manager is reconfigured, or the manager is dropped.
/// Every connection handed out has foreign-key enforcement enabled.
///
/// The manager does no locking of its own; `&mut self` on every
/// connection-touching method serializes access.
pub struct DatabaseManager {
    path: PathBuf,
    sink: Option<Arc<dyn DiagnosticSink>>,
    conn: Option<Connection>,
}

impl DatabaseManager {
    /// Create a manager for the database file at `path` without a diagnostic sink
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sink: None,
            conn: None,
        }
    }

    /// Create a manager that reports diagnostics to `sink`
    pub fn with_sink<P: AsRef<Path>>(path: P, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sink: Some(sink),
            conn: None,
        }
    }

    /// Re-target the manager
    ///
    /// Any held connection is committed and closed first; a failure there is
    /// logged through the previous sink and otherwise ignored.
    pub fn configure<P: AsRef<Path>>(&mut self, path: P, sink: Option<Arc<dyn DiagnosticSink>>) {
        let _ = self.close_connection();
        self.path = path.as_ref().to_path_buf();
        self.sink = sink;
        debug!("database manager configured for {}", self.path.display());
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a connection is currently held
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Get the connection, opening it if necessary
    ///
    /// An existing connection is reused. Foreign keys are switched on every
    /// time; if that fails the connection is torn down and `DbError::Pragma`
    /// is returned, so the next call starts from a fresh connection.
    pub fn connection(&mut self) -> Result<&Connection, DbError> {
        if self.path.as_os_str().is_empty() {
            return Err(DbError::Configuration(
                "DatabaseManager must be configured with a database file path".to_string(),
            ));
        }

        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.open()?,
        };

        if let Err(e) = conn.execute("PRAGMA foreign_keys=ON", []) {
            self.log_severe("Failed to enable database foreign keys");
            self.log_severe(&e.to_string());
            let _ = self.shutdown(conn);
            return Err(DbError::Pragma(e));
        }

        let conn: &Connection = self.conn.insert(conn);
        Ok(conn)
    }

    fn open(&self) -> Result<Connection, DbError> {
        let result = ensure_parent_dir(&self.path).and_then(|_| {
            Connection::open(&self.path).map_err(|e| DbError::Connect {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
        });

        match result {
            Ok(conn) => {
                debug!("opened database connection to {}", self.path.display());
                Ok(conn)
            }
            Err(e) => {
                self.log_severe("Failed to connect to database");
                self.log_severe(&e.to_string());
                Err(e)
            }
        }
    }

    /// Commit pending changes and close the connection
    ///
    /// A no-op success when nothing is held. The held connection is released
    /// even when committing or closing fails.
    pub fn close_connection(&mut self) -> Result<(), DbError> {
        match self.conn.take() {
            Some(conn) => self.shutdown(conn),
            None => Ok(()),
        }
    }

    fn shutdown(&self, conn: Connection) -> Result<(), DbError> {
        let mut commit_error = None;
        if !conn.is_autocommit() {
            if let Err(e) = conn.execute_batch("COMMIT") {
                self.log_severe("Failed to commit changes to database before closing");
                commit_error = Some(e);
            }
        }

        if let Err((_conn, e)) = conn.close() {
            self.log_warning("Failed to close database connection");
            return Err(DbError::Close(e));
        }

        debug!("closed database connection to {}", self.path.display());
        match commit_error {
            Some(e) => Err(DbError::Commit(e)),
            None => Ok(()),
        }
    }

    /// Check if a table exists in the database
    pub fn table_exists(&mut self, table_name: &str) -> Result<bool, DbError> {
        let count: i64 = self.connection()?.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get the row count for a table
    pub fn table_count(&mut self, table_name: &str) -> Result<u64, DbError> {
        let query = format!("SELECT COUNT(*) FROM {}", table_name);
        let count: u64 = self.connection()?.query_row(&query, [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn log_info(&self, msg: &str) {
        if let Some(sink) = &self.sink {
            sink.info(msg);
        }
    }

    pub fn log_warning(&self, msg: &str) {
        if let Some(sink) = &self.sink {
            sink.warning(msg);
        }
    }

    pub fn log_severe(&self, msg: &str) {
        if let Some(sink) = &self.sink {
            sink.severe(msg);
        }
    }
}

/// Dropping the manager commits and closes like [`DatabaseManager::close_connection`],
/// except while the thread is panicking: a half-finished transaction is then
/// rolled back instead of committed.
impl Drop for DatabaseManager {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let _ = self.close_connection();
            return;
        }

        if let Some(conn) = self.conn.take() {
            if !conn.is_autocommit() {
                let _ = conn.execute_batch("ROLLBACK");
                self.log_warning("Rolled back pending database changes after a panic");
            }
            let _ = conn.close();
        }
    }
}

impl fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("path", &self.path)
            .field("has_sink", &self.sink.is_some())
            .field("open", &self.conn.is_some())
            .finish()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DbError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| DbError::Connect {
                path: path.display().to_string(),
                reason: format!("unable to create directory '{}': {}", parent.display(), e),
            })
        }
        _ => Ok(()),
    }
}
