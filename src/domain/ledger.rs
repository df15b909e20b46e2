//! The ledger: accounts plus the append-only transaction log.

use super::account::{Account, AccountId, AccountStatus, Balance};
use super::transaction::TransactionRecord;
use rust_decimal_macros::dec;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Source of truth for balances and transaction history.
///
/// There is no way to remove accounts or records; balances move only through
/// the transfer engine.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    accounts: HashMap<AccountId, Account>,
    /// Insertion order is creation order
    transactions: Vec<TransactionRecord>,
    /// Idempotency keys of every stored record
    idempotency_keys: HashSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger holding `accounts`. When two accounts share an id the
    /// first one is kept.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut ledger = Self::new();
        for account in accounts {
            ledger.insert_account(account);
        }
        ledger
    }

    /// The fixed accounts used for local development.
    pub fn seeded() -> Self {
        Self::with_accounts(seed_accounts())
    }

    /// Opens `account`. Returns false, leaving the ledger unchanged, if its id
    /// is already taken.
    pub(crate) fn insert_account(&mut self, account: Account) -> bool {
        match self.accounts.entry(account.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(account);
                true
            }
        }
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Both sides of a transfer, borrowed together. `None` unless the ids
    /// differ and both accounts exist.
    pub(crate) fn account_pair_mut(
        &mut self,
        from: AccountId,
        to: AccountId,
    ) -> Option<(&mut Account, &mut Account)> {
        if from == to {
            return None;
        }
        match self.accounts.get_disjoint_mut([&from, &to]) {
            [Some(from), Some(to)] => Some((from, to)),
            _ => None,
        }
    }

    /// All accounts, ordered by id.
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|a| a.id);
        accounts
    }

    pub fn append(&mut self, record: TransactionRecord) {
        if let Some(key) = &record.idempotency_key {
            self.idempotency_keys.insert(key.clone());
        }
        self.transactions.push(record);
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Returns true if a stored record already carries `key`.
    pub fn has_idempotency_key(&self, key: &str) -> bool {
        self.idempotency_keys.contains(key)
    }

    /// Sum of every account balance.
    pub fn total_balance(&self) -> Balance {
        self.accounts
            .values()
            .fold(Balance::ZERO, |sum, a| sum + a.balance)
    }
}

pub fn seed_accounts() -> Vec<Account> {
    vec![
        Account::new(
            1,
            "John Doe",
            Balance::new(dec!(5000.00)),
            AccountStatus::Active,
        ),
        Account::new(
            2,
            "Jane Smith",
            Balance::new(dec!(2500.50)),
            AccountStatus::Active,
        ),
        Account::new(
            3,
            "Closed Account",
            Balance::new(dec!(100.00)),
            AccountStatus::Closed,
        ),
    ]
}
