//! Relational repository over the `client`/`account` schema.
//!
//! # Responsibility
//! - Stage and commit record batches atomically.
//! - Run full and equality-filtered scans per entity type.
//! - Resolve both directions of the client/account association.
//!
//! # Invariants
//! - A batch either commits completely or leaves no rows behind.
//! - Store errors surface unchanged inside `RepoError::Db`.

pub mod bank_repo;
pub mod entity;
