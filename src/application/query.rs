use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ledger::Ledger;
use crate::domain::transaction::TransactionRecord;
use crate::error::{Result, TransferError};
use crate::infrastructure::in_memory::InMemoryLedgerStore;

/// Read-only lookups over the ledger.
#[derive(Clone)]
pub struct QueryService {
    store: InMemoryLedgerStore,
}

impl QueryService {
    pub fn new(store: InMemoryLedgerStore) -> Self {
        Self { store }
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account> {
        let ledger = self.store.read().await;
        ledger
            .account(id)
            .cloned()
            .ok_or(TransferError::UnknownAccount(id))
    }

    pub async fn get_balance(&self, id: AccountId) -> Result<Balance> {
        let ledger = self.store.read().await;
        ledger
            .account(id)
            .map(|a| a.balance)
            .ok_or(TransferError::UnknownAccount(id))
    }

    /// Every record sent or received by `id`, most recent first.
    pub async fn get_transactions(&self, id: AccountId) -> Result<Vec<TransactionRecord>> {
        let ledger = self.store.read().await;
        history(&ledger, id)
    }
}

/// Records involving `id` sorted by `created_on` descending. Records created
/// at the same instant keep their insertion order.
pub(crate) fn history(ledger: &Ledger, id: AccountId) -> Result<Vec<TransactionRecord>> {
    if ledger.account(id).is_none() {
        return Err(TransferError::UnknownAccount(id));
    }

    let mut records: Vec<TransactionRecord> = ledger
        .transactions()
        .iter()
        .filter(|tx| tx.involves(id))
        .cloned()
        .collect();
    // sort_by is stable
    records.sort_by(|a, b| b.created_on.cmp(&a.created_on));
    Ok(records)
}
