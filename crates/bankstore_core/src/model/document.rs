//! Nested client document stored in the document collection.
//!
//! The store itself is schema-less; these types only give the sample data a
//! fixed shape. Unknown fields such as `_id` are ignored when reading back.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Top-level client document with an embedded account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDocument {
    pub name: String,
    pub national_id: String,
    pub address: String,
    pub account: AccountDocument,
}

/// Account embedded in a [`ClientDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDocument {
    pub id: String,
    /// Open set of categories, e.g. `Checking`, `Savings`, `Investment`.
    #[serde(rename = "type")]
    pub kind: String,
    pub branch: String,
    pub number: i64,
    pub balance: f64,
}

impl Display for ClientDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | national_id={} | address={} | account(id={}, type={}, branch={}, number={}, balance={:.2})",
            self.name,
            self.national_id,
            self.address,
            self.account.id,
            self.account.kind,
            self.account.branch,
            self.account.number,
            self.account.balance
        )
    }
}
