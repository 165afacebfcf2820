//! Read-only schema introspection.

use super::DbResult;
use rusqlite::{Connection, OptionalExtension};

/// Whether a user table named `table` exists in the main schema.
pub fn has_table(conn: &Connection, table: &str) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// User table names sorted by name. SQLite internal tables are excluded.
pub fn table_names(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name;",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Name of the schema unqualified table references resolve against.
pub fn default_schema_name(conn: &Connection) -> DbResult<String> {
    let name = conn.query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(1))?;
    Ok(name)
}
