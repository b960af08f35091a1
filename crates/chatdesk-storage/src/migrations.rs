//! Schema migrations
//!
//! The applied version lives in SQLite's `user_version` pragma. Each step
//! runs in its own transaction together with the version bump.

use rusqlite::Connection;

use crate::error::StorageError;
use crate::Result;

/// Ordered `(version, sql)` steps; versions start at 1 and have no gaps.
const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
)];

pub(crate) fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(StorageError::Migration {
            version: current,
            reason: format!("database is newer than supported schema {latest}"),
        });
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        tracing::info!(version, "Applying storage migration");

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(|e| StorageError::Migration {
            version: *version,
            reason: e.to_string(),
        })?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    Ok(())
}

pub(crate) fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
