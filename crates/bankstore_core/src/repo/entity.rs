//! Table mapping for the relational entity types.

use crate::model::account::{Account, AccountField};
use crate::model::balance_from_cents;
use crate::model::client::{Client, ClientField};
use rusqlite::Row;

/// Column that can appear in an equality filter.
pub trait EntityField: Copy {
    fn column(self) -> &'static str;
}

/// A record type backed by one table.
pub trait Entity: Sized {
    const TABLE: &'static str;
    /// `SELECT <all columns> FROM <table>` with no trailing clause.
    const SELECT_SQL: &'static str;
    type Field: EntityField;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl EntityField for ClientField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::NationalId => "national_id",
            Self::Address => "address",
        }
    }
}

impl EntityField for AccountField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Kind => "type",
            Self::Branch => "branch",
            Self::Number => "number",
            Self::ClientId => "client_id",
        }
    }
}

impl Entity for Client {
    const TABLE: &'static str = "client";
    const SELECT_SQL: &'static str = "SELECT
    id,
    name,
    national_id,
    address
FROM client";
    type Field = ClientField;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            national_id: row.get("national_id")?,
            address: row.get("address")?,
        })
    }
}

impl Entity for Account {
    const TABLE: &'static str = "account";
    const SELECT_SQL: &'static str = "SELECT
    id,
    type,
    branch,
    number,
    balance_cents,
    client_id
FROM account";
    type Field = AccountField;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kind: row.get("type")?,
            branch: row.get("branch")?,
            number: row.get("number")?,
            balance: balance_from_cents(row.get("balance_cents")?),
            client_id: row.get("client_id")?,
        })
    }
}
