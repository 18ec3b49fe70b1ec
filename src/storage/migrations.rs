//! Embedded schema migrations
//!
//! Scripts live in `migrations/` and are compiled in with `include_str!`.
//! Applied ids are recorded in `schema_version`; re-running is a no-op.

use rusqlite::{Connection, OptionalExtension};
use crate::{Error, Result};

/// A versioned migration script
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations, in application order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    },
    Migration {
        id: "002_lookup_indexes",
        sql: include_str!("../../migrations/002_lookup_indexes.sql"),
    },
];

const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL
)
"#;

/// Id of the newest embedded migration
pub fn head() -> &'static str {
    MIGRATIONS.last().map(|m| m.id).unwrap_or_default()
}

/// Apply every pending migration up to head.
///
/// Returns the ids applied by this call, empty when already at head.
pub fn apply_migrations(conn: &mut Connection) -> Result<Vec<&'static str>> {
    conn.execute(CREATE_SCHEMA_VERSION_TABLE, [])?;

    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        if apply_migration(conn, migration)? {
            applied.push(migration.id);
        }
    }
    Ok(applied)
}

/// Ids recorded in `schema_version`, oldest first.
///
/// Read-only: a database that was never migrated reports nothing applied.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let tracked = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !tracked {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare("SELECT migration_id FROM schema_version ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(ids)
}

/// Embedded migrations not yet recorded in `schema_version`
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let applied = applied_migrations(conn)?;
    Ok(MIGRATIONS
        .iter()
        .map(|m| m.id)
        .filter(|id| !applied.iter().any(|a| a == id))
        .collect())
}

/// Apply a single migration if not already applied
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<bool> {
    let already_applied = conn
        .query_row(
            "SELECT 1 FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    if already_applied {
        tracing::debug!("Migration {} already applied", migration.id);
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql).map_err(|e| Error::Migration {
        id: migration.id.to_string(),
        message: e.to_string(),
    })?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at) VALUES (?1, ?2)",
        rusqlite::params![migration.id, chrono::Utc::now().timestamp()],
    )?;
    tx.commit()?;

    tracing::info!("Applied migration {}", migration.id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_apply_migrations_on_empty_db() {
        let mut conn = Connection::open_in_memory().unwrap();

        let applied = apply_migrations(&mut conn).unwrap();
        assert_eq!(applied, vec!["001_initial_schema", "002_lookup_indexes"]);

        let tables = table_names(&conn);
        for expected in ["groups", "students", "teachers", "subjects", "grades", "schema_version"] {
            assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
        }
    }

    #[test]
    fn test_idempotency() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();

        let second = apply_migrations(&mut conn).unwrap();
        assert!(second.is_empty());
        assert_eq!(applied_migrations(&conn).unwrap().len(), MIGRATIONS.len());
    }

    #[test]
    fn test_pending_until_applied() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(pending_migrations(&conn).unwrap().len(), MIGRATIONS.len());

        apply_migrations(&mut conn).unwrap();
        assert!(pending_migrations(&conn).unwrap().is_empty());
        assert_eq!(head(), "002_lookup_indexes");
    }

    #[test]
    fn test_listing_does_not_create_tracking_table() {
        let conn = Connection::open_in_memory().unwrap();

        assert!(applied_migrations(&conn).unwrap().is_empty());
        assert_eq!(pending_migrations(&conn).unwrap().len(), MIGRATIONS.len());
        assert!(!table_names(&conn).contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_failed_migration_reports_id() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute(CREATE_SCHEMA_VERSION_TABLE, []).unwrap();

        let broken = Migration { id: "999_broken", sql: "CREATE TABLE (" };
        let err = apply_migration(&mut conn, &broken).unwrap_err();
        match err {
            Error::Migration { id, .. } => assert_eq!(id, "999_broken"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(applied_migrations(&conn).unwrap().is_empty());
    }
}
