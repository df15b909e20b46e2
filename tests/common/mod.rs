#![allow(dead_code)]

use money_transfer::domain::account::{AccountId, Balance};
use money_transfer::infrastructure::mock::MockBackend;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub async fn balance_of(backend: &MockBackend, id: AccountId) -> Balance {
    let ledger = backend.store().read().await;
    ledger.account(id).expect("account exists").balance
}

pub async fn total_of(backend: &MockBackend) -> Balance {
    backend.store().read().await.total_balance()
}

pub fn write_transfers_csv(path: &Path, rows: &[[&str; 4]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["from", "to", "amount", "idempotency_key"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
