//! Request and response shapes exchanged with a transfer executor.

use super::account::{AccountId, Amount, Balance};
use super::transaction::{TransactionId, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Confirmation message attached to every successful transfer.
pub const TRANSFER_COMPLETED: &str = "Transfer completed";

/// A request to move `amount` from one account to another.
///
/// `amount` is kept as a raw decimal so that a non-positive value can be
/// rejected at its proper place in the validation order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl TransferRequest {
    pub fn new(from_account_id: AccountId, to_account_id: AccountId, amount: Decimal) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// The idempotency key, if one was given. An empty key counts as none.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Receipt returned for a completed transfer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    pub message: String,
    pub debited_from: AccountId,
    pub credited_to: AccountId,
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct BalanceResponse {
    pub balance: Balance,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub account_id: AccountId,
    pub holder_name: String,
}
