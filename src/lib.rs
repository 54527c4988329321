#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Wormhole - persistence for player jumps and signs
//!
//! Wormhole stores teleport points ("jumps"), the signs linked to them, and
//! player identities in a single embedded SQLite file. This crate owns the
//! storage side only: one connection, one schema ledger, and the ordered
//! migration steps that bring a database file up to date. Gameplay code
//! borrows the connection and runs its own statements.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none)  | Connection manager, migrations, configuration | `rusqlite`, `config` |
//! | `cli`   | `wormhole` inspection/migration binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: connection lifecycle, schema ledger, migrations, error kinds
//! - **[`config`]**: configuration file/environment loading and database inspection
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wormhole::database::{DatabaseManager, TracingSink};
//!
//! let mut db = DatabaseManager::with_sink("plugins/Wormhole/wormhole.db", Arc::new(TracingSink));
//!
//! // Once at startup, before touching any table
//! db.migrate()?;
//!
//! // Later, from gameplay code
//! let conn = db.connection()?;
//! let jumps: i64 = conn.query_row("SELECT COUNT(*) FROM jumps", [], |row| row.get(0))?;
//!
//! // On shutdown
//! db.close_connection()?;
//! ```

pub mod config;
pub mod database;

// =============================================================================
// Configuration
// =============================================================================

pub use self::config::{format_size, get_database_info, DatabaseInfo, WormholeConfig};

// =============================================================================
// Database
// =============================================================================

pub use database::{
    DatabaseManager, DbError, DiagnosticSink, ErrorKind, MigrationError, SchemaManager,
    SchemaStatus, TracingSink, LATEST_VERSION, UNVERSIONED,
};
