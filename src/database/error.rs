//! Error kinds for the persistence layer
//!
//! Every public database operation returns one of these instead of panicking.
//! `DbError::kind()` collapses the variants into a small `Copy` enumeration so
//! callers can branch on data rather than on error types.

use thiserror::Error;

/// Coarse classification of a [`DbError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manager was never given a usable database path (caller bug)
    Configuration,
    /// The database file could not be opened
    Connect,
    /// Foreign-key enforcement could not be enabled
    Pragma,
    /// A query failed outside of a migration step
    Query,
    /// A migration step or its ledger write failed
    MigrationStep,
    /// Pending changes could not be committed before closing
    Commit,
    /// The connection could not be closed cleanly
    Close,
}

/// Failure inside a single migration step
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to create table '{table}': {source}")]
    CreateTable {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("migration statement failed: {0}")]
    Statement(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database path is not configured: {0}")]
    Configuration(String),

    #[error("failed to connect to database at '{path}': {reason}")]
    Connect { path: String, reason: String },

    #[error("failed to enable database foreign keys: {0}")]
    Pragma(#[source] rusqlite::Error),

    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("migration to v{version} ({name}) failed: {source}")]
    Migration {
        version: i64,
        name: &'static str,
        #[source]
        source: MigrationError,
    },

    #[error("failed to set database version to {version}: {source}")]
    Ledger {
        version: i64,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to commit changes to database before closing: {0}")]
    Commit(#[source] rusqlite::Error),

    #[error("failed to close database connection: {0}")]
    Close(#[source] rusqlite::Error),
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Connect { .. } => ErrorKind::Connect,
            Self::Pragma(_) => ErrorKind::Pragma,
            Self::Query(_) => ErrorKind::Query,
            Self::Migration { .. } | Self::Ledger { .. } => ErrorKind::MigrationStep,
            Self::Commit(_) => ErrorKind::Commit,
            Self::Close(_) => ErrorKind::Close,
        }
    }

    /// Whether the failure means no database is available right now
    ///
    /// Connect and pragma failures both leave the manager without a
    /// connection; callers should retry later rather than give up.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Connect | ErrorKind::Pragma)
    }
}
