//! Schema declaration for the `client`/`account` tables.
//!
//! # Invariants
//! - Every statement is `IF NOT EXISTS`, so applying the schema twice is a no-op.
//! - A database stamped with a newer `user_version` is never touched.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Version stamped into `PRAGMA user_version` once the schema is present.
pub const SCHEMA_VERSION: u32 = 1;

/// Tables the relational façade requires, in creation order.
pub const REQUIRED_TABLES: &[&str] = &["client", "account"];

/// Creates missing tables inside one transaction and stamps the version.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    if current < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
