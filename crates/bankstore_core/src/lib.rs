//! Core data-access layer for the bank client demo stores.
//! Two independent façades live here: a MongoDB document store and a
//! SQLite relational store. Neither touches the other.

pub mod config;
pub mod db;
pub mod docstore;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sample;
pub mod service;

pub use config::{DocumentStoreConfig, RelationalStoreConfig};
pub use docstore::{
    DocResult, DocStoreError, DocumentCollection, DocumentCursor, DocumentDatabase, DocumentStore,
    InsertOutcome,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::account::{
    Account, AccountField, AccountId, AccountOwner, BatchClientRef, NewAccount,
};
pub use model::client::{Client, ClientField, ClientId, NewClient};
pub use model::document::{AccountDocument, ClientDocument};
pub use model::BalanceError;
pub use repo::bank_repo::{
    BankRepository, InsertBatch, InsertedIds, RepoError, RepoResult, SqliteBankRepository,
};
pub use repo::entity::{Entity, EntityField};
pub use service::{DocumentWalkthrough, RelationalWalkthrough, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
