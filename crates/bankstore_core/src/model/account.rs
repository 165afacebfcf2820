//! Bank account record and its owner reference.
//!
//! # Invariants
//! - Every persisted account belongs to exactly one client (`client_id`).
//! - The foreign key is enforced by SQLite, not by this type.

use super::client::ClientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Generated primary key of a persisted account.
pub type AccountId = i64;

/// Persisted account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Serialized as `type` to match the column name.
    #[serde(rename = "type")]
    pub kind: String,
    pub branch: String,
    pub number: i64,
    /// Always carries scale 2 when read back from the store.
    pub balance: Decimal,
    pub client_id: ClientId,
}

/// Handle to a client staged in the same insert batch.
///
/// Only meaningful for the batch that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchClientRef(pub(crate) usize);

impl BatchClientRef {
    /// Position of the client within its batch.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owning side of a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOwner {
    /// A client already stored, by id. Not checked before the insert runs.
    Existing(ClientId),
    /// A client inserted earlier in the same batch.
    Batch(BatchClientRef),
}

/// Account values before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub kind: String,
    pub branch: String,
    pub number: i64,
    pub balance: Decimal,
    pub owner: AccountOwner,
}

impl NewAccount {
    pub fn new(
        kind: impl Into<String>,
        branch: impl Into<String>,
        number: i64,
        balance: Decimal,
        owner: AccountOwner,
    ) -> Self {
        Self {
            kind: kind.into(),
            branch: branch.into(),
            number,
            balance,
            owner,
        }
    }
}

/// Account columns usable in equality filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Id,
    Kind,
    Branch,
    Number,
    ClientId,
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Account(id={}, type={}, branch={}, number={}, balance={}, client_id={})",
            self.id, self.kind, self.branch, self.number, self.balance, self.client_id
        )
    }
}
