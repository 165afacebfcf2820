//! SQLite connection bootstrap, schema setup and introspection.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections with foreign keys enforced.
//! - Create the `client`/`account` schema when absent.
//! - Answer read-only metadata questions about the schema.
//!
//! # Invariants
//! - Schema version is mirrored to `PRAGMA user_version`.
//! - No application data is read or written before schema setup succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod inspect;
mod open;
pub mod schema;

pub use inspect::{default_schema_name, has_table, table_names};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
