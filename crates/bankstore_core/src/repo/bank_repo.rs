//! Bank repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert clients and accounts as one transaction.
//! - Provide full scans, equality filters and association lookups.
//! - Stream rows one at a time through `scan_*`; `select_*` collect them.
//!
//! # Invariants
//! - Balances are validated for every account before any SQL runs.
//! - Foreign keys are checked by SQLite; a violation rolls back the batch.

use crate::db::schema::{current_user_version, REQUIRED_TABLES, SCHEMA_VERSION};
use crate::db::{has_table, DbError};
use crate::model::account::{
    Account, AccountField, AccountId, AccountOwner, BatchClientRef, NewAccount,
};
use crate::model::client::{Client, ClientField, ClientId, NewClient};
use crate::model::{balance_to_cents, BalanceError};
use crate::repo::entity::{Entity, EntityField};
use log::{debug, error, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for relational persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Validation(BalanceError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    UnknownBatchClient(BatchClientRef),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::UnknownBatchClient(client_ref) => write!(
                f,
                "account references batch client #{} which is not part of this batch",
                client_ref.index()
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::UnknownBatchClient(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<BalanceError> for RepoError {
    fn from(value: BalanceError) -> Self {
        Self::Validation(value)
    }
}

/// Clients and accounts staged for one transactional insert.
///
/// Accounts may point at clients added earlier to the same batch through the
/// [`BatchClientRef`] returned by [`InsertBatch::add_client`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertBatch {
    clients: Vec<NewClient>,
    accounts: Vec<NewAccount>,
}

impl InsertBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a client and returns a handle accounts can own-reference.
    pub fn add_client(&mut self, client: NewClient) -> BatchClientRef {
        self.clients.push(client);
        BatchClientRef(self.clients.len() - 1)
    }

    pub fn add_account(&mut self, account: NewAccount) {
        self.accounts.push(account);
    }

    pub fn clients(&self) -> &[NewClient] {
        &self.clients
    }

    pub fn accounts(&self) -> &[NewAccount] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.accounts.is_empty()
    }
}

/// Generated ids of a committed batch, in staging order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertedIds {
    pub clients: Vec<ClientId>,
    pub accounts: Vec<AccountId>,
}

/// Repository interface for the client/account store.
pub trait BankRepository {
    /// Inserts the whole batch in one transaction.
    fn insert_all(&mut self, batch: &InsertBatch) -> RepoResult<InsertedIds>;
    /// Every row of `E`, in storage order.
    fn select_all<E: Entity>(&self) -> RepoResult<Vec<E>>;
    /// Rows of `E` whose `field` equals `value`.
    fn select_where<E, V>(&self, field: E::Field, value: V) -> RepoResult<Vec<E>>
    where
        E: Entity,
        V: Into<Value>;
    /// Decodes every row of `E` and hands it to `visit` as it is read.
    ///
    /// No row is buffered. An error from `visit` stops the scan and is
    /// returned. Yields the number of rows visited.
    fn scan_all<E, F>(&self, visit: F) -> RepoResult<usize>
    where
        E: Entity,
        F: FnMut(E) -> RepoResult<()>;
    /// Streaming form of [`BankRepository::select_where`].
    fn scan_where<E, V, F>(&self, field: E::Field, value: V, visit: F) -> RepoResult<usize>
    where
        E: Entity,
        V: Into<Value>,
        F: FnMut(E) -> RepoResult<()>;
    fn count<E: Entity>(&self) -> RepoResult<u64>;
    /// Accounts owned by `client`, ordered by account id.
    fn accounts_of(&self, client: &Client) -> RepoResult<Vec<Account>>;
    /// Owner of `account`; `None` only if the row vanished.
    fn client_of(&self, account: &Account) -> RepoResult<Option<Client>>;
}

/// SQLite-backed bank repository.
pub struct SqliteBankRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBankRepository<'conn> {
    /// Wraps a connection prepared by `db::open_db`/`db::open_db_in_memory`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for introspection helpers.
    pub fn connection(&self) -> &Connection {
        &*self.conn
    }

    fn scan_sql<E, F>(
        &self,
        event: &str,
        sql: &str,
        bind: &[Value],
        mut visit: F,
    ) -> RepoResult<usize>
    where
        E: Entity,
        F: FnMut(E) -> RepoResult<()>,
    {
        let started_at = Instant::now();
        let result = stream_rows(&*self.conn, sql, bind, &mut visit);
        log_read(event, E::TABLE, started_at, result.as_ref().copied());
        result
    }
}

impl BankRepository for SqliteBankRepository<'_> {
    fn insert_all(&mut self, batch: &InsertBatch) -> RepoResult<InsertedIds> {
        let started_at = Instant::now();

        let balances = batch
            .accounts
            .iter()
            .map(|account| balance_to_cents(account.balance))
            .collect::<Result<Vec<_>, _>>()?;

        let tx = self.conn.transaction()?;
        let result = insert_batch(&tx, batch, &balances);
        match result {
            Ok(ids) => {
                tx.commit()?;
                info!(
                    "event=insert_all module=repo status=ok clients={} accounts={} duration_ms={}",
                    ids.clients.len(),
                    ids.accounts.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ids)
            }
            Err(err) => {
                // Dropping `tx` rolls the batch back.
                error!(
                    "event=insert_all module=repo status=error clients={} accounts={} duration_ms={} error={}",
                    batch.clients.len(),
                    batch.accounts.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn select_all<E: Entity>(&self) -> RepoResult<Vec<E>> {
        let mut rows = Vec::new();
        self.scan_all::<E, _>(|row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(rows)
    }

    fn select_where<E, V>(&self, field: E::Field, value: V) -> RepoResult<Vec<E>>
    where
        E: Entity,
        V: Into<Value>,
    {
        let mut rows = Vec::new();
        self.scan_where::<E, V, _>(field, value, |row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(rows)
    }

    fn scan_all<E, F>(&self, visit: F) -> RepoResult<usize>
    where
        E: Entity,
        F: FnMut(E) -> RepoResult<()>,
    {
        self.scan_sql("repo_scan_all", E::SELECT_SQL, &[], visit)
    }

    fn scan_where<E, V, F>(&self, field: E::Field, value: V, visit: F) -> RepoResult<usize>
    where
        E: Entity,
        V: Into<Value>,
        F: FnMut(E) -> RepoResult<()>,
    {
        let sql = format!("{} WHERE {} = ?1", E::SELECT_SQL, field.column());
        self.scan_sql("repo_scan_where", &sql, &[value.into()], visit)
    }

    fn count<E: Entity>(&self) -> RepoResult<u64> {
        let started_at = Instant::now();
        let result = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {};", E::TABLE), [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(RepoError::from)
            .and_then(|count| {
                u64::try_from(count)
                    .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
            });
        log_read(
            "repo_count",
            E::TABLE,
            started_at,
            result.as_ref().map(|count| *count as usize),
        );
        result
    }

    fn accounts_of(&self, client: &Client) -> RepoResult<Vec<Account>> {
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY id ASC",
            Account::SELECT_SQL,
            AccountField::ClientId.column()
        );
        let mut accounts = Vec::new();
        self.scan_sql::<Account, _>(
            "repo_accounts_of",
            &sql,
            &[Value::Integer(client.id)],
            |account| {
                accounts.push(account);
                Ok(())
            },
        )?;
        Ok(accounts)
    }

    fn client_of(&self, account: &Account) -> RepoResult<Option<Client>> {
        let started_at = Instant::now();
        let sql = format!(
            "{} WHERE {} = ?1",
            Client::SELECT_SQL,
            ClientField::Id.column()
        );
        let result = self
            .conn
            .query_row(&sql, [account.client_id], |row| Client::from_row(row))
            .optional()
            .map_err(RepoError::from);
        log_read(
            "repo_client_of",
            Client::TABLE,
            started_at,
            result.as_ref().map(|client| usize::from(client.is_some())),
        );
        result
    }
}

fn stream_rows<E, F>(
    conn: &Connection,
    sql: &str,
    bind: &[Value],
    visit: &mut F,
) -> RepoResult<usize>
where
    E: Entity,
    F: FnMut(E) -> RepoResult<()>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind))?;
    let mut visited = 0;
    while let Some(row) = rows.next()? {
        visit(E::from_row(row)?)?;
        visited += 1;
    }
    Ok(visited)
}

fn log_read(event: &str, table: &str, started_at: Instant, outcome: Result<usize, &RepoError>) {
    match outcome {
        Ok(rows) => debug!(
            "event={} module=repo status=ok table={} rows={} duration_ms={}",
            event,
            table,
            rows,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={} module=repo status=error table={} duration_ms={} error={}",
            event,
            table,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}

fn insert_batch(
    tx: &Transaction<'_>,
    batch: &InsertBatch,
    balances: &[i64],
) -> RepoResult<InsertedIds> {
    let mut ids = InsertedIds::default();

    let mut insert_client = tx.prepare(
        "INSERT INTO client (name, national_id, address) VALUES (?1, ?2, ?3);",
    )?;
    for client in &batch.clients {
        insert_client.execute(params![
            client.name.as_str(),
            client.national_id.as_str(),
            client.address.as_str(),
        ])?;
        ids.clients.push(tx.last_insert_rowid());
    }

    let mut insert_account = tx.prepare(
        "INSERT INTO account (
            type,
            branch,
            number,
            balance_cents,
            client_id
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for (account, cents) in batch.accounts.iter().zip(balances) {
        let client_id = match account.owner {
            AccountOwner::Existing(id) => id,
            AccountOwner::Batch(client_ref) => *ids
                .clients
                .get(client_ref.index())
                .ok_or(RepoError::UnknownBatchClient(client_ref))?,
        };
        insert_account.execute(params![
            account.kind.as_str(),
            account.branch.as_str(),
            account.number,
            cents,
            client_id,
        ])?;
        ids.accounts.push(tx.last_insert_rowid());
    }

    Ok(ids)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        if !has_table(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BankRepository, InsertBatch, RepoError, SqliteBankRepository};
    use crate::db::open_db_in_memory;
    use crate::model::account::{Account, AccountOwner, BatchClientRef, NewAccount};
    use crate::model::client::{Client, NewClient};
    use rust_decimal::Decimal;

    #[test]
    fn foreign_batch_reference_rolls_back_staged_clients() {
        let mut conn = open_db_in_memory().unwrap();
        let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();

        let mut batch = InsertBatch::new();
        batch.add_client(NewClient::new("Ana", "321654987", "Rua D"));
        batch.add_account(NewAccount::new(
            "Checking",
            "Branch 9",
            9,
            Decimal::new(100, 0),
            AccountOwner::Batch(BatchClientRef(3)),
        ));

        let err = repo.insert_all(&batch).unwrap_err();
        assert!(matches!(
            err,
            RepoError::UnknownBatchClient(client_ref) if client_ref.index() == 3
        ));
        assert_eq!(repo.count::<Client>().unwrap(), 0);
        assert_eq!(repo.count::<Account>().unwrap(), 0);
    }

    #[test]
    fn add_client_hands_out_sequential_refs() {
        let mut batch = InsertBatch::new();
        assert!(batch.is_empty());
        let first = batch.add_client(NewClient::new("A", "1", "x"));
        let second = batch.add_client(NewClient::new("B", "2", "y"));
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(batch.clients().len(), 2);
        assert!(batch.accounts().is_empty());
    }
}
