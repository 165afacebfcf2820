//! Introspect → insert → query pass over the relational store.

use super::{ServiceResult, SEPARATOR};
use crate::db::schema::REQUIRED_TABLES;
use crate::db::{default_schema_name, has_table, table_names};
use crate::model::account::{Account, AccountField};
use crate::model::client::{Client, ClientField};
use crate::repo::bank_repo::{BankRepository, SqliteBankRepository};
use crate::sample;
use rusqlite::Connection;
use std::io::Write;

const LOOKUP_NAME: &str = "João";
const LOOKUP_ACCOUNT_NUMBER: i64 = 2;

/// Seeds the sample clients and accounts and prints them back. The rows are
/// left in the database.
pub struct RelationalWalkthrough<'a> {
    conn: &'a mut Connection,
}

impl<'a> RelationalWalkthrough<'a> {
    /// `conn` must come from `db::open_db` or `db::open_db_in_memory`.
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Runs every step once, writing one line per result to `out`.
    pub fn run(&mut self, out: &mut impl Write) -> ServiceResult<()> {
        for &table in REQUIRED_TABLES {
            writeln!(out, "table {table} exists: {}", has_table(self.conn, table)?)?;
        }
        writeln!(out, "tables: [{}]", table_names(self.conn)?.join(", "))?;
        writeln!(out, "default schema: {}", default_schema_name(self.conn)?)?;

        let mut repo = SqliteBankRepository::try_new(self.conn)?;
        let ids = repo.insert_all(&sample::relational_batch())?;
        writeln!(
            out,
            "inserted {} clients and {} accounts",
            ids.clients.len(),
            ids.accounts.len()
        )?;

        writeln!(out, "\nRetrieving clients...")?;
        for client in repo.select_all::<Client>()? {
            writeln!(out, "{client}")?;
        }
        writeln!(out, "{SEPARATOR}")?;

        writeln!(out, "\nRetrieving accounts...")?;
        for account in repo.select_all::<Account>()? {
            writeln!(out, "{account}")?;
        }
        writeln!(out, "{SEPARATOR}")?;

        writeln!(out, "\nSearching client by name: {LOOKUP_NAME}")?;
        let named = repo.select_where::<Client, _>(ClientField::Name, LOOKUP_NAME.to_string())?;
        for client in named {
            writeln!(out, "{client}")?;
            for account in repo.accounts_of(&client)? {
                writeln!(out, "  owns {account}")?;
            }
        }
        writeln!(out, "{SEPARATOR}")?;

        writeln!(out, "\nSearching account by number: {LOOKUP_ACCOUNT_NUMBER}")?;
        let numbered =
            repo.select_where::<Account, _>(AccountField::Number, LOOKUP_ACCOUNT_NUMBER)?;
        for account in numbered {
            writeln!(out, "{account}")?;
            if let Some(owner) = repo.client_of(&account)? {
                writeln!(out, "  owned by {owner}")?;
            }
        }
        Ok(())
    }
}
