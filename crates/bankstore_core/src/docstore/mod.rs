//! MongoDB document-store façade.
//!
//! # Responsibility
//! - Open a client from an opaque connection string.
//! - Expose database/collection lookups and batch CRUD on a collection.
//!
//! # Invariants
//! - Database and collection lookups never touch the server; both are created
//!   lazily by the first write.
//! - Driver errors are passed through unchanged as the error source.
//! - Deleting everything and deleting by match are separate operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod collection;
mod store;

pub use collection::{field_filter, DocumentCollection, DocumentCursor, InsertOutcome};
pub use store::{DocumentDatabase, DocumentStore};

pub type DocResult<T> = Result<T, DocStoreError>;

#[derive(Debug)]
pub enum DocStoreError {
    /// Malformed connection string or unreachable deployment.
    Connection(mongodb::error::Error),
    /// Any other failure reported by the driver or the server.
    Driver(mongodb::error::Error),
}

impl Display for DocStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "document store connection failed: {err}"),
            Self::Driver(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) | Self::Driver(err) => Some(err),
        }
    }
}

impl From<mongodb::error::Error> for DocStoreError {
    fn from(value: mongodb::error::Error) -> Self {
        Self::Driver(value)
    }
}
