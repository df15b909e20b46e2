use super::account::{AccountId, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction identifier.
pub type TransactionId = Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// An entry of the transaction log.
///
/// Records are created once, when a transfer has passed every check and the
/// balances have moved, and are never modified afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Amount,
    pub status: TransactionStatus,
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds a successful record with a freshly generated id.
    pub fn success(
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Amount,
        idempotency_key: Option<String>,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_account_id,
            to_account_id,
            amount,
            status: TransactionStatus::Success,
            failure_reason: None,
            idempotency_key,
            created_on,
        }
    }

    /// Returns true if `account` sent or received this transaction.
    pub fn involves(&self, account: AccountId) -> bool {
        self.from_account_id == account || self.to_account_id == account
    }
}
