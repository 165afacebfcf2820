//! Fixed demo data: fictional bank clients and their accounts.
//!
//! Nothing here runs on load; callers decide when to seed.

use crate::model::account::{AccountOwner, NewAccount};
use crate::model::client::NewClient;
use crate::model::document::{AccountDocument, ClientDocument};
use crate::repo::bank_repo::InsertBatch;
use rust_decimal::Decimal;

/// Six clients, each with one embedded account.
pub fn documents() -> Vec<ClientDocument> {
    vec![
        client(
            "Naruto Uzumaki",
            "12345678901",
            "Konoha Street",
            account("1", "Checking", "Hidden Leaf Bank", 1, 1000.0),
        ),
        client(
            "Luffy Monkey D.",
            "98765432109",
            "One Piece Avenue",
            account("2", "Savings", "Sunny Bank", 2, 500.0),
        ),
        client(
            "Cloud Strife",
            "45678912305",
            "Final Fantasy Boulevard",
            account("3", "Investment", "Mako Bank", 3, 2000.0),
        ),
        client(
            "Zelda",
            "78912345607",
            "Hyrule Lane",
            account("4", "Checking", "Castle Bank", 4, 1500.0),
        ),
        client(
            "Kirby",
            "65478932105",
            "Dream Land Street",
            account("5", "Savings", "Popopo Bank", 5, 200.0),
        ),
        client(
            "Sonic the Hedgehog",
            "32165498708",
            "Green Hill Road",
            account("6", "Investment", "Ring Bank", 6, 3000.0),
        ),
    ]
}

fn client(
    name: &str,
    national_id: &str,
    address: &str,
    account: AccountDocument,
) -> ClientDocument {
    ClientDocument {
        name: name.to_string(),
        national_id: national_id.to_string(),
        address: address.to_string(),
        account,
    }
}

fn account(id: &str, kind: &str, branch: &str, number: i64, balance: f64) -> AccountDocument {
    AccountDocument {
        id: id.to_string(),
        kind: kind.to_string(),
        branch: branch.to_string(),
        number,
        balance,
    }
}

/// Four clients and three accounts: two owned by the first client, one by
/// the second.
pub fn relational_batch() -> InsertBatch {
    let mut batch = InsertBatch::new();
    let joao = batch.add_client(NewClient::new("João", "123456789", "Rua A"));
    let maria = batch.add_client(NewClient::new("Maria", "987654321", "Rua B"));
    batch.add_client(NewClient::new("Pedro", "456789123", "Rua C"));
    batch.add_client(NewClient::new("Ana", "321654987", "Rua D"));

    batch.add_account(NewAccount::new(
        "Checking",
        "Branch 1",
        1,
        Decimal::new(1000_00, 2),
        AccountOwner::Batch(joao),
    ));
    batch.add_account(NewAccount::new(
        "Savings",
        "Branch 2",
        2,
        Decimal::new(2000_00, 2),
        AccountOwner::Batch(joao),
    ));
    batch.add_account(NewAccount::new(
        "Checking",
        "Branch 3",
        3,
        Decimal::new(3000_00, 2),
        AccountOwner::Batch(maria),
    ));
    batch
}
