//! Database schema management
//!
//! This module holds the table definitions, the ordered list of migration
//! steps, and `SchemaManager`, which reads the version ledger and applies the
//! missing steps.
//!
//! The ledger is the single-row `schema_version` table. A missing table or a
//! missing row both mean the database is unversioned.

use crate::database::core::connection::DatabaseManager;
use crate::database::error::{DbError, MigrationError};
use rusqlite::Connection;
use std::fmt;
use tracing::{debug, warn};

/// Version reported for a database without a usable ledger
pub const UNVERSIONED: i64 = -1;

/// Schema definitions for all tables in the wormhole database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Version ledger, holds at most one row
    pub const SCHEMA_VERSION_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            `version` INTEGER
        );
    "#;

    pub const PLAYERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS players (
            `uuid`     CHAR(36) PRIMARY KEY,
            `username` VARCHAR(16)
        );
    "#;

    /// A jump's name is unique per player; jumps go away with their player
    pub const JUMPS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS jumps (
            `id`          INTEGER PRIMARY KEY,
            `player_uuid` CHAR(36) REFERENCES players(`uuid`)
                          ON DELETE CASCADE ON UPDATE CASCADE,
            `name`        TEXT,
            `world_uuid`  CHAR(36),
            `x` REAL, `y` REAL, `z` REAL, `yaw` REAL,
            UNIQUE (`player_uuid`, `name`)
        );
    "#;

    /// Signs are keyed by block position and go away with their jump
    pub const SIGNS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS signs (
            `world_uuid` CHAR(36),
            `x` INTEGER, `y` INTEGER, `z` INTEGER,
            `jump_id`    INTEGER REFERENCES jumps(`id`)
                         ON DELETE CASCADE ON UPDATE CASCADE,
            PRIMARY KEY (`world_uuid`, `x`, `y`, `z`)
        );
    "#;

    /// Tables created by the bootstrap step, in creation order
    pub const BOOTSTRAP_TABLES: &'static [(&'static str, &'static str)] = &[
        ("schema_version", Self::SCHEMA_VERSION_TABLE),
        ("players", Self::PLAYERS_TABLE),
        ("jumps", Self::JUMPS_TABLE),
        ("signs", Self::SIGNS_TABLE),
    ];
}

/// One step of the schema history
///
/// `apply` brings a database at `version - 1` to `version`. Steps must be
/// idempotent: a step interrupted before its ledger write runs again on the
/// next migration.
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub apply: fn(&Connection) -> Result<(), MigrationError>,
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish()
    }
}

/// All migration steps, ascending by version
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 0,
    name: "bootstrap",
    apply: bootstrap,
}];

/// Latest schema version this build knows about
pub const LATEST_VERSION: i64 = 0;

fn bootstrap(conn: &Connection) -> Result<(), MigrationError> {
    for &(table, sql) in SchemaDefinitions::BOOTSTRAP_TABLES {
        conn.execute(sql, [])
            .map_err(|source| MigrationError::CreateTable { table, source })?;
    }
    Ok(())
}

/// Steps needed to bring a database at `current` up to `LATEST_VERSION`
pub fn pending_migrations(current: i64) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |m| m.version > current && m.version <= LATEST_VERSION)
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// No ledger, or an empty one (fresh database)
    NotInitialized,

    /// Ledger is at `LATEST_VERSION`
    Current,

    /// Ledger is behind `LATEST_VERSION`
    NeedsMigration { from: i64, to: i64 },

    /// Database was written by a newer build
    Newer {
        database_version: i64,
        latest_version: i64,
    },
}

impl fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current"),
            SchemaStatus::NeedsMigration { from, to } => {
                write!(f, "needs migration (v{} -> v{})", from, to)
            }
            SchemaStatus::Newer {
                database_version,
                latest_version,
            } => write!(
                f,
                "newer than this build (db: v{}, latest: v{})",
                database_version, latest_version
            ),
        }
    }
}

/// Schema manager for the wormhole database
///
/// Reads and writes the version ledger and runs migration steps through the
/// manager's single connection.
pub struct SchemaManager<'a> {
    db: &'a mut DatabaseManager,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given database
    pub fn new(db: &'a mut DatabaseManager) -> Self {
        Self { db }
    }

    /// Get the installed schema version
    ///
    /// Returns [`UNVERSIONED`] when the ledger table or its row is missing,
    /// and also on any connection or query error.
    pub fn current_version(&mut self) -> i64 {
        let conn = match self.db.connection() {
            Ok(conn) => conn,
            Err(_) => return UNVERSIONED,
        };

        conn.query_row("SELECT `version` FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, Option<i64>>(0)
        })
        .ok()
        .flatten()
        .unwrap_or(UNVERSIONED)
    }

    /// Replace the ledger contents with a single row holding `version`
    ///
    /// Deletes every row and inserts one inside a transaction, so stray rows
    /// are cleared and the replacement is atomic. When the connection is
    /// already inside a transaction the replacement runs under a savepoint
    /// and is committed with that transaction. Does not undo any schema work
    /// that preceded it.
    pub fn set_version(&mut self, version: i64) -> Result<(), DbError> {
        let result = self.db.connection().and_then(|conn| {
            write_ledger(conn, version).map_err(|source| DbError::Ledger { version, source })
        });

        if let Err(e) = &result {
            self.db.log_severe("Failed to set database version");
            self.db.log_severe(&e.to_string());
        }
        result
    }

    /// Bring the database up to `LATEST_VERSION`
    ///
    /// Runs every step above the current version in ascending order, writing
    /// the ledger after each one. The first failure stops the run; steps
    /// already applied stay applied and nothing is rolled back. Running
    /// again on an up-to-date database is a no-op.
    pub fn migrate(&mut self) -> Result<(), DbError> {
        let current = self.current_version();

        if current > LATEST_VERSION {
            warn!(
                "database schema v{} is newer than latest known v{}",
                current, LATEST_VERSION
            );
            self.db.log_warning(&format!(
                "Database version {} is newer than this build supports ({})",
                current, LATEST_VERSION
            ));
            return Ok(());
        }

        for migration in pending_migrations(current) {
            self.apply(migration)?;
        }

        Ok(())
    }

    fn apply(&mut self, migration: &'static Migration) -> Result<(), DbError> {
        debug!(
            "migrating database to v{} ({})",
            migration.version, migration.name
        );
        self.db
            .log_info(&format!("Creating database v{}...", migration.version));

        let result = self.db.connection().and_then(|conn| {
            (migration.apply)(conn).map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })
        });
        if let Err(e) = result {
            self.db.log_severe(&e.to_string());
            return Err(e);
        }

        if let Err(e) = self.set_version(migration.version) {
            self.db.log_severe(&format!(
                "Failed to set database version to {}",
                migration.version
            ));
            return Err(e);
        }

        self.db.log_info("Done.");
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&mut self) -> SchemaStatus {
        let current = self.current_version();

        if current == UNVERSIONED {
            SchemaStatus::NotInitialized
        } else if current == LATEST_VERSION {
            SchemaStatus::Current
        } else if current < LATEST_VERSION {
            SchemaStatus::NeedsMigration {
                from: current,
                to: LATEST_VERSION,
            }
        } else {
            SchemaStatus::Newer {
                database_version: current,
                latest_version: LATEST_VERSION,
            }
        }
    }
}

fn write_ledger(conn: &Connection, version: i64) -> rusqlite::Result<()> {
    if conn.is_autocommit() {
        let tx = conn.unchecked_transaction()?;
        replace_ledger_row(&tx, version)?;
        return tx.commit();
    }

    // Caller already holds a transaction: nest inside it
    conn.execute_batch("SAVEPOINT ledger")?;
    match replace_ledger_row(conn, version) {
        Ok(()) => conn.execute_batch("RELEASE ledger"),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO ledger; RELEASE ledger");
            Err(e)
        }
    }
}

fn replace_ledger_row(conn: &Connection, version: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (`version`) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

impl DatabaseManager {
    /// Bring the database up to the latest schema version
    ///
    /// Meant to be called once at startup, before any table access.
    pub fn migrate(&mut self) -> Result<(), DbError> {
        SchemaManager::new(self).migrate()
    }

    /// Installed schema version, or [`UNVERSIONED`]
    pub fn schema_version(&mut self) -> i64 {
        SchemaManager::new(self).current_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::sink::testing::{RecordingSink, Severity};
    use crate::database::error::ErrorKind;
    use std::sync::Arc;
    use tempfile::TempDir;

    const PLAYER_A: &str = "00000000-0000-0000-0000-00000000000a";
    const PLAYER_B: &str = "00000000-0000-0000-0000-00000000000b";
    const WORLD: &str = "11111111-1111-1111-1111-111111111111";

    fn temp_db() -> (TempDir, DatabaseManager) {
        let dir = TempDir::new().unwrap();
        let db = DatabaseManager::new(dir.path().join("wormhole.db"));
        (dir, db)
    }

    fn migrated_db() -> (TempDir, DatabaseManager) {
        let (dir, mut db) = temp_db();
        db.migrate().unwrap();
        (dir, db)
    }

    fn insert_player(db: &mut DatabaseManager, uuid: &str, name: &str) {
        db.connection()
            .unwrap()
            .execute(
                "INSERT INTO players (uuid, username) VALUES (?1, ?2)",
                [uuid, name],
            )
            .unwrap();
    }

    fn insert_jump(db: &mut DatabaseManager, player: &str, name: &str) -> rusqlite::Result<i64> {
        let conn = db.connection().unwrap();
        conn.execute(
            "INSERT INTO jumps (player_uuid, name, world_uuid, x, y, z, yaw)
             VALUES (?1, ?2, ?3, 10.5, 64.0, -3.25, 90.0)",
            [player, name, WORLD],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_sign(db: &mut DatabaseManager, x: i64, jump_id: i64) {
        db.connection()
            .unwrap()
            .execute(
                "INSERT INTO signs (world_uuid, x, y, z, jump_id) VALUES (?1, ?2, 70, 5, ?3)",
                rusqlite::params![WORLD, x, jump_id],
            )
            .unwrap();
    }

    fn is_constraint_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    #[test]
    fn test_migrations_are_ordered() {
        assert!(!MIGRATIONS.is_empty());
        assert_eq!(MIGRATIONS[0].version, 0);
        for pair in MIGRATIONS.windows(2) {
            assert_eq!(pair[1].version, pair[0].version + 1);
        }
        assert_eq!(MIGRATIONS[MIGRATIONS.len() - 1].version, LATEST_VERSION);
    }

    #[test]
    fn test_pending_migrations() {
        let all: Vec<i64> = pending_migrations(UNVERSIONED).map(|m| m.version).collect();
        assert_eq!(all, (0..=LATEST_VERSION).collect::<Vec<_>>());
        assert_eq!(pending_migrations(LATEST_VERSION).count(), 0);
        assert_eq!(pending_migrations(LATEST_VERSION + 3).count(), 0);
    }

    #[test]
    fn test_fresh_database_is_unversioned() {
        let (_dir, mut db) = temp_db();
        let mut schema = SchemaManager::new(&mut db);
        assert_eq!(schema.current_version(), UNVERSIONED);
        assert_eq!(schema.check_status(), SchemaStatus::NotInitialized);
    }

    #[test]
    fn test_migrate_fresh_database() {
        let (_dir, mut db) = temp_db();
        assert_eq!(db.schema_version(), UNVERSIONED);

        db.migrate().unwrap();
        assert_eq!(db.schema_version(), 0);
        assert_eq!(SchemaManager::new(&mut db).check_status(), SchemaStatus::Current);

        for (table, _) in SchemaDefinitions::BOOTSTRAP_TABLES {
            assert!(db.table_exists(table).unwrap(), "missing table {}", table);
        }
        assert_eq!(db.table_count("schema_version").unwrap(), 1);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let (dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");

        db.migrate().unwrap();
        assert_eq!(db.schema_version(), 0);
        assert_eq!(db.table_count("schema_version").unwrap(), 1);
        assert_eq!(db.table_count("players").unwrap(), 1);

        // Fresh manager against the same file
        drop(db);
        let mut db = DatabaseManager::new(dir.path().join("wormhole.db"));
        db.migrate().unwrap();
        assert_eq!(db.schema_version(), 0);
        assert_eq!(db.table_count("players").unwrap(), 1);
    }

    #[test]
    fn test_set_version_replaces_stray_rows() {
        let (_dir, mut db) = migrated_db();
        db.connection()
            .unwrap()
            .execute_batch("INSERT INTO schema_version (version) VALUES (7), (8);")
            .unwrap();
        assert_eq!(db.table_count("schema_version").unwrap(), 3);

        SchemaManager::new(&mut db).set_version(0).unwrap();
        assert_eq!(db.table_count("schema_version").unwrap(), 1);
        assert_eq!(db.schema_version(), 0);
    }

    #[test]
    fn test_set_version_inside_open_transaction() {
        let (_dir, mut db) = migrated_db();
        db.connection().unwrap().execute_batch("BEGIN;").unwrap();

        SchemaManager::new(&mut db).set_version(1).unwrap();
        assert!(!db.connection().unwrap().is_autocommit());
        assert_eq!(db.schema_version(), 1);
        assert_eq!(db.table_count("schema_version").unwrap(), 1);

        // Outer transaction still decides
        db.connection().unwrap().execute_batch("ROLLBACK;").unwrap();
        assert_eq!(db.schema_version(), 0);
    }

    #[test]
    fn test_failed_set_version_keeps_outer_transaction() {
        let (_dir, mut db) = migrated_db();
        db.connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER ledger_guard BEFORE INSERT ON schema_version
                 BEGIN SELECT RAISE(ABORT, 'ledger locked'); END;
                 BEGIN;
                 INSERT INTO players (uuid, username) VALUES ('u1', 'steve');",
            )
            .unwrap();

        let err = SchemaManager::new(&mut db).set_version(3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MigrationStep);
        assert!(!db.connection().unwrap().is_autocommit());
        assert_eq!(db.schema_version(), 0);

        db.connection().unwrap().execute_batch("COMMIT;").unwrap();
        assert_eq!(db.table_count("players").unwrap(), 1);
        assert_eq!(db.table_count("schema_version").unwrap(), 1);
    }

    #[test]
    fn test_migrate_inside_open_transaction() {
        let (dir, mut db) = temp_db();
        db.connection().unwrap().execute_batch("BEGIN;").unwrap();

        db.migrate().unwrap();
        assert_eq!(db.schema_version(), 0);

        // Closing commits the caller's transaction
        db.close_connection().unwrap();
        let mut db = DatabaseManager::new(dir.path().join("wormhole.db"));
        assert_eq!(db.schema_version(), 0);
        assert!(db.table_exists("signs").unwrap());
    }

    #[test]
    fn test_null_version_is_unversioned() {
        let (_dir, mut db) = temp_db();
        db.connection()
            .unwrap()
            .execute_batch(
                "CREATE TABLE schema_version (version INTEGER);
                 INSERT INTO schema_version (version) VALUES (NULL);",
            )
            .unwrap();
        assert_eq!(db.schema_version(), UNVERSIONED);
    }

    #[test]
    fn test_foreign_key_enforced() {
        let (_dir, mut db) = migrated_db();
        let err = insert_jump(&mut db, PLAYER_A, "home").unwrap_err();
        assert!(is_constraint_violation(&err));

        insert_player(&mut db, PLAYER_A, "alice");
        assert!(insert_jump(&mut db, PLAYER_A, "home").is_ok());
    }

    #[test]
    fn test_jump_name_unique_per_player() {
        let (_dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");
        insert_player(&mut db, PLAYER_B, "bob");

        insert_jump(&mut db, PLAYER_A, "home").unwrap();
        let err = insert_jump(&mut db, PLAYER_A, "home").unwrap_err();
        assert!(is_constraint_violation(&err));

        insert_jump(&mut db, PLAYER_A, "mine").unwrap();
        insert_jump(&mut db, PLAYER_B, "home").unwrap();
        assert_eq!(db.table_count("jumps").unwrap(), 3);
    }

    #[test]
    fn test_sign_primary_key() {
        let (_dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");
        let jump = insert_jump(&mut db, PLAYER_A, "home").unwrap();
        insert_sign(&mut db, 1, jump);

        let err = db
            .connection()
            .unwrap()
            .execute(
                "INSERT INTO signs (world_uuid, x, y, z, jump_id) VALUES (?1, 1, 70, 5, ?2)",
                rusqlite::params![WORLD, jump],
            )
            .unwrap_err();
        assert!(is_constraint_violation(&err));
    }

    #[test]
    fn test_delete_player_cascades() {
        let (_dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");
        insert_player(&mut db, PLAYER_B, "bob");
        let home = insert_jump(&mut db, PLAYER_A, "home").unwrap();
        insert_jump(&mut db, PLAYER_A, "mine").unwrap();
        let bob_home = insert_jump(&mut db, PLAYER_B, "home").unwrap();
        insert_sign(&mut db, 1, home);
        insert_sign(&mut db, 2, bob_home);

        db.connection()
            .unwrap()
            .execute("DELETE FROM players WHERE uuid = ?1", [PLAYER_A])
            .unwrap();

        assert_eq!(db.table_count("jumps").unwrap(), 1);
        assert_eq!(db.table_count("signs").unwrap(), 1);
    }

    #[test]
    fn test_delete_jump_cascades_to_signs() {
        let (_dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");
        let home = insert_jump(&mut db, PLAYER_A, "home").unwrap();
        let mine = insert_jump(&mut db, PLAYER_A, "mine").unwrap();
        insert_sign(&mut db, 1, home);
        insert_sign(&mut db, 2, home);
        insert_sign(&mut db, 3, mine);

        db.connection()
            .unwrap()
            .execute("DELETE FROM jumps WHERE id = ?1", [home])
            .unwrap();

        assert_eq!(db.table_count("signs").unwrap(), 1);
        assert_eq!(db.table_count("players").unwrap(), 1);
    }

    #[test]
    fn test_update_player_uuid_cascades() {
        let (_dir, mut db) = migrated_db();
        insert_player(&mut db, PLAYER_A, "alice");
        insert_jump(&mut db, PLAYER_A, "home").unwrap();

        db.connection()
            .unwrap()
            .execute(
                "UPDATE players SET uuid = ?1 WHERE uuid = ?2",
                [PLAYER_B, PLAYER_A],
            )
            .unwrap();

        let owner: String = db
            .connection()
            .unwrap()
            .query_row("SELECT player_uuid FROM jumps WHERE name = 'home'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(owner, PLAYER_B);
    }

    #[test]
    fn test_ledger_failure_then_retry() {
        let (_dir, mut db) = temp_db();
        // Ledger exists but refuses writes
        db.connection()
            .unwrap()
            .execute_batch(
                "CREATE TABLE schema_version (version INTEGER);
                 CREATE TRIGGER ledger_guard BEFORE INSERT ON schema_version
                 BEGIN SELECT RAISE(ABORT, 'ledger locked'); END;",
            )
            .unwrap();

        let err = db.migrate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MigrationStep);
        assert!(matches!(err, DbError::Ledger { version: 0, .. }));
        assert_eq!(db.schema_version(), UNVERSIONED);
        for (table, _) in SchemaDefinitions::BOOTSTRAP_TABLES {
            assert!(db.table_exists(table).unwrap(), "missing table {}", table);
        }

        db.connection()
            .unwrap()
            .execute_batch("DROP TRIGGER ledger_guard;")
            .unwrap();

        db.migrate().unwrap();
        assert_eq!(db.schema_version(), 0);
        assert_eq!(db.table_count("schema_version").unwrap(), 1);
    }

    #[test]
    fn test_table_failure_aborts_step() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let mut db = DatabaseManager::with_sink(dir.path().join("wormhole.db"), sink.clone());

        // An index named `signs` blocks the sign table
        db.connection()
            .unwrap()
            .execute_batch(
                "CREATE TABLE blocker (id INTEGER);
                 CREATE INDEX signs ON blocker(id);",
            )
            .unwrap();

        let err = db.migrate().unwrap_err();
        match &err {
            DbError::Migration {
                version,
                source: MigrationError::CreateTable { table, .. },
                ..
            } => {
                assert_eq!(*version, 0);
                assert_eq!(*table, "signs");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(db.table_exists("players").unwrap());
        assert!(db.table_exists("jumps").unwrap());
        assert!(!db.table_exists("signs").unwrap());
        assert_eq!(db.schema_version(), UNVERSIONED);

        assert!(sink
            .messages()
            .iter()
            .any(|(s, m)| *s == Severity::Severe && m.contains("'signs'")));
    }

    #[test]
    fn test_newer_database_is_left_alone() {
        let (_dir, mut db) = migrated_db();
        SchemaManager::new(&mut db).set_version(LATEST_VERSION + 5).unwrap();

        db.migrate().unwrap();
        assert_eq!(db.schema_version(), LATEST_VERSION + 5);
        assert_eq!(
            SchemaManager::new(&mut db).check_status(),
            SchemaStatus::Newer {
                database_version: LATEST_VERSION + 5,
                latest_version: LATEST_VERSION,
            }
        );
    }

    #[test]
    fn test_migrate_without_database() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();
        let mut db = DatabaseManager::new(blocker.join("wormhole.db"));

        assert_eq!(db.schema_version(), UNVERSIONED);
        let err = db.migrate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connect);
    }

    #[test]
    fn test_migrate_logs_milestones() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let mut db = DatabaseManager::with_sink(dir.path().join("wormhole.db"), sink.clone());

        db.migrate().unwrap();
        let messages = sink.messages();
        assert_eq!(
            messages,
            vec![
                (Severity::Info, "Creating database v0...".to_string()),
                (Severity::Info, "Done.".to_string()),
            ]
        );

        // Up to date: nothing more to report
        db.migrate().unwrap();
        assert_eq!(sink.messages().len(), 2);
    }
}
