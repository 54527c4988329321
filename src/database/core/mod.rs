//! Core database infrastructure
//!
//! This module provides the foundational database components:
//! - `DatabaseManager`: owner of the single SQLite connection
//! - `SchemaManager`: version ledger and ordered migration steps
//! - `DiagnosticSink`: optional receiver for lifecycle and failure messages

mod connection;
mod schema;
mod sink;

pub use connection::DatabaseManager;
pub use schema::{
    pending_migrations, Migration, SchemaDefinitions, SchemaManager, SchemaStatus,
    LATEST_VERSION, MIGRATIONS, UNVERSIONED,
};
pub use sink::{DiagnosticSink, TracingSink};
