use bankstore_core::db::open_db_in_memory;
use bankstore_core::sample;
use bankstore_core::{
    Account, AccountField, AccountOwner, BankRepository, Client, ClientField, InsertBatch,
    NewAccount, NewClient, RepoError, SqliteBankRepository,
};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn batch_with_in_batch_owners_commits_and_is_visible() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();

    let ids = repo.insert_all(&sample::relational_batch()).unwrap();
    assert_eq!(ids.clients.len(), 4);
    assert_eq!(ids.accounts.len(), 3);

    let clients = repo.select_all::<Client>().unwrap();
    let names: Vec<_> = clients.iter().map(|client| client.name.as_str()).collect();
    assert_eq!(names, vec!["João", "Maria", "Pedro", "Ana"]);

    let accounts = repo.select_all::<Account>().unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0].client_id, ids.clients[0]);
    assert_eq!(accounts[1].client_id, ids.clients[0]);
    assert_eq!(accounts[2].client_id, ids.clients[1]);
    assert_eq!(accounts[2].balance, Decimal::from_str("3000.00").unwrap());
}

#[test]
fn account_with_missing_client_rejects_whole_batch() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    repo.insert_all(&sample::relational_batch()).unwrap();
    let clients_before = repo.count::<Client>().unwrap();
    let accounts_before = repo.count::<Account>().unwrap();

    let mut batch = InsertBatch::new();
    let owner = batch.add_client(NewClient::new("Bia", "111222333", "Rua E"));
    batch.add_account(NewAccount::new(
        "Checking",
        "Branch 4",
        4,
        Decimal::new(10, 0),
        AccountOwner::Batch(owner),
    ));
    batch.add_account(NewAccount::new(
        "Savings",
        "Branch 5",
        5,
        Decimal::new(20, 0),
        AccountOwner::Existing(9_999),
    ));

    let err = repo.insert_all(&batch).unwrap_err();
    match err {
        RepoError::Db(db_err) => assert!(
            db_err.to_string().contains("FOREIGN KEY"),
            "unexpected db error: {db_err}"
        ),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(repo.count::<Client>().unwrap(), clients_before);
    assert_eq!(repo.count::<Account>().unwrap(), accounts_before);
}

#[test]
fn account_can_reference_previously_persisted_client() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    let ids = repo.insert_all(&sample::relational_batch()).unwrap();
    let pedro = ids.clients[2];

    let mut batch = InsertBatch::new();
    batch.add_account(NewAccount::new(
        "Investment",
        "Branch 6",
        6,
        Decimal::from_str("12.5").unwrap(),
        AccountOwner::Existing(pedro),
    ));
    let added = repo.insert_all(&batch).unwrap();
    assert_eq!(added.accounts.len(), 1);

    let found = repo
        .select_where::<Account, _>(AccountField::ClientId, pedro)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].balance.to_string(), "12.50");
}

#[test]
fn invalid_balance_is_rejected_before_any_row_is_written() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();

    let mut batch = InsertBatch::new();
    let owner = batch.add_client(NewClient::new("Caio", "444555666", "Rua F"));
    batch.add_account(NewAccount::new(
        "Checking",
        "Branch 7",
        7,
        Decimal::from_str("1.005").unwrap(),
        AccountOwner::Batch(owner),
    ));

    let err = repo.insert_all(&batch).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count::<Client>().unwrap(), 0);
}

#[test]
fn select_where_returns_single_match_or_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    let ids = repo.insert_all(&sample::relational_batch()).unwrap();

    let maria = repo
        .select_where::<Client, _>(ClientField::Name, "Maria".to_string())
        .unwrap();
    assert_eq!(
        maria,
        vec![Client {
            id: ids.clients[1],
            name: "Maria".to_string(),
            national_id: "987654321".to_string(),
            address: "Rua B".to_string(),
        }]
    );

    let nobody = repo
        .select_where::<Client, _>(ClientField::NationalId, "000000000".to_string())
        .unwrap();
    assert!(nobody.is_empty());

    let second = repo
        .select_where::<Account, _>(AccountField::Number, 2_i64)
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].kind, "Savings");
    assert_eq!(second[0].branch, "Branch 2");
}

#[test]
fn association_resolves_in_both_directions() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    repo.insert_all(&sample::relational_batch()).unwrap();

    let clients = repo.select_all::<Client>().unwrap();
    let joao = &clients[0];
    let owned = repo.accounts_of(joao).unwrap();
    let numbers: Vec<_> = owned.iter().map(|account| account.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(owned[0].id < owned[1].id);

    for account in &owned {
        let owner = repo.client_of(account).unwrap().unwrap();
        assert_eq!(&owner, joao);
    }

    let ana = &clients[3];
    assert!(repo.accounts_of(ana).unwrap().is_empty());
}

#[test]
fn scan_visits_rows_in_storage_order_without_collecting() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    repo.insert_all(&sample::relational_batch()).unwrap();

    let mut numbers = Vec::new();
    let visited = repo
        .scan_all(|account: Account| {
            numbers.push(account.number);
            Ok(())
        })
        .unwrap();
    assert_eq!(visited, 3);
    assert_eq!(numbers, vec![1, 2, 3]);

    let mut addresses = Vec::new();
    let visited = repo
        .scan_where(ClientField::Name, "Pedro".to_string(), |client: Client| {
            addresses.push(client.address);
            Ok(())
        })
        .unwrap();
    assert_eq!(visited, 1);
    assert_eq!(addresses, vec!["Rua C".to_string()]);
}

#[test]
fn scan_stops_at_first_visitor_error() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBankRepository::try_new(&mut conn).unwrap();
    repo.insert_all(&sample::relational_batch()).unwrap();

    let mut seen = 0;
    let err = repo
        .scan_all(|client: Client| {
            seen += 1;
            if client.name == "Maria" {
                return Err(RepoError::InvalidData("stop".to_string()));
            }
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message == "stop"));
    assert_eq!(seen, 2);
}
