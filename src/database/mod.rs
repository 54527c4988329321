//! Database module
//!
//! All persistence for wormhole goes through one SQLite file and one
//! connection:
//!
//! - **core**: connection lifecycle, diagnostic sink, schema ledger and migrations
//! - **error**: error kinds returned by every database operation
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/
//! │   ├── connection  # DatabaseManager: lazy open, reuse, commit-then-close
//! │   ├── schema      # table definitions, migration steps, SchemaManager
//! │   └── sink        # DiagnosticSink trait and the tracing-backed sink
//! └── error           # DbError, MigrationError, ErrorKind
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wormhole::database::{DatabaseManager, TracingSink};
//!
//! let mut db = DatabaseManager::with_sink("plugins/Wormhole/wormhole.db", Arc::new(TracingSink));
//! if let Err(e) = db.migrate() {
//!     // persistence is unavailable; disable jump and sign features
//!     eprintln!("{e}");
//! }
//!
//! // Gameplay code borrows the shared connection for its own statements
//! let conn = db.connection()?;
//! conn.execute("INSERT INTO players (uuid, username) VALUES (?1, ?2)", [uuid, name])?;
//!
//! db.close_connection()?;
//! ```

pub mod core;
pub mod error;

pub use self::core::{
    pending_migrations, DatabaseManager, DiagnosticSink, Migration, SchemaDefinitions,
    SchemaManager, SchemaStatus, TracingSink, LATEST_VERSION, MIGRATIONS, UNVERSIONED,
};
pub use error::{DbError, ErrorKind, MigrationError};
