use crate::domain::account::Account;
use crate::domain::ledger::Ledger;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe in-memory ledger.
///
/// Uses `Arc<RwLock<Ledger>>` so that clones share the same accounts and history.
/// A writer holds the lock for a whole transfer, which serializes every transfer
/// against every other one; readers never see a half-applied transfer.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with the development seed accounts.
    pub fn seeded() -> Self {
        Self::from_ledger(Ledger::seeded())
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self::from_ledger(Ledger::with_accounts(accounts))
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().await
    }

    /// Copy of the current ledger state.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.read().await.clone()
    }
}
