use super::account::{Account, AccountId, Balance};
use super::transaction::TransactionRecord;
use super::transfer::{LoginRequest, LoginResponse, TransferReceipt, TransferRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Capability through which callers move money and read account state.
///
/// Implemented by the in-memory mock backend and by the HTTP client of the
/// real server, so callers never depend on which one is in use.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse>;
    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt>;
    async fn account(&self, id: AccountId) -> Result<Account>;
    async fn balance(&self, id: AccountId) -> Result<Balance>;
    /// History of `id`, most recent first.
    async fn transactions(&self, id: AccountId) -> Result<Vec<TransactionRecord>>;
}

pub type TransferExecutorBox = Box<dyn TransferExecutor>;
