//! Connection settings for both stores.
//!
//! # Responsibility
//! - Carry the opaque connection values each façade needs.
//! - Provide defaults matching the demo deployment.
//!
//! # Invariants
//! - Connection strings are never parsed here; the drivers own that.

use std::path::PathBuf;
use std::time::Duration;

/// Default MongoDB connection string template. Credentials and cluster host
/// are placeholders that callers replace.
pub const DEFAULT_MONGODB_URI: &str = "mongodb+srv://pymongo:<password>@<cluster>.<cluster-id>.mongodb.net/?retryWrites=true&w=majority";
pub const DEFAULT_DATABASE: &str = "Banco";
pub const DEFAULT_COLLECTION: &str = "bank";
pub const DEFAULT_SQLITE_PATH: &str = "banco.db";
const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the MongoDB document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Upper bound for finding a usable server before an operation fails.
    pub server_selection_timeout: Duration,
    /// Sends `ping` during connect so an unreachable endpoint fails early.
    pub ping_on_connect: bool,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
            ping_on_connect: true,
        }
    }
}

impl DocumentStoreConfig {
    /// Config for `uri` with every other field at its default.
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

/// Settings for the SQLite relational store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalStoreConfig {
    /// Database file; the file is the entire persisted state.
    pub path: PathBuf,
}

impl Default for RelationalStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SQLITE_PATH),
        }
    }
}
