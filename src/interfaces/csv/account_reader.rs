use crate::domain::account::{Account, AccountId, AccountStatus, Balance};
use crate::error::{Result, TransferError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct AccountRow {
    id: AccountId,
    holder_name: String,
    balance: Balance,
    status: AccountStatus,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::new(row.id, row.holder_name, row.balance, row.status)
    }
}

/// Reads seed accounts from a CSV source with the header
/// `id, holder_name, balance, status`.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        self.reader
            .into_deserialize::<AccountRow>()
            .map(|result| result.map(Account::from).map_err(TransferError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_seed_accounts() {
        let data = "id, holder_name, balance, status\n\
                    1, John Doe, 5000.00, ACTIVE\n\
                    3, Closed Account, 100.00, CLOSED";
        let accounts: Vec<Account> = AccountReader::new(data.as_bytes())
            .accounts()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].holder_name, "John Doe");
        assert_eq!(accounts[0].balance, Balance::new(dec!(5000)));
        assert_eq!(accounts[1].status, AccountStatus::Closed);
    }

    #[test]
    fn test_rejects_unknown_status() {
        let data = "id, holder_name, balance, status\n1, John Doe, 1.0, FROZEN";
        let results: Vec<_> = AccountReader::new(data.as_bytes()).accounts().collect();
        assert!(results[0].is_err());
    }
}
