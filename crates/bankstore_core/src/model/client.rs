//! Bank client record.
//!
//! A client owns zero or more [`Account`](super::account::Account)s; the
//! repository resolves that side of the association with `accounts_of`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Generated primary key of a persisted client.
pub type ClientId = i64;

/// Persisted client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub national_id: String,
    pub address: String,
}

/// Client values before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub national_id: String,
    pub address: String,
}

impl NewClient {
    pub fn new(
        name: impl Into<String>,
        national_id: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            address: address.into(),
        }
    }
}

/// Client columns usable in equality filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Id,
    Name,
    NationalId,
    Address,
}

impl Display for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Client(id={}, name={}, national_id={}, address={})",
            self.id, self.name, self.national_id, self.address
        )
    }
}
