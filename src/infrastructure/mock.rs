use super::in_memory::InMemoryLedgerStore;
use crate::application::engine::TransferEngine;
use crate::application::query::QueryService;
use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ports::TransferExecutor;
use crate::domain::transaction::TransactionRecord;
use crate::domain::transfer::{LoginRequest, LoginResponse, TransferReceipt, TransferRequest};
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// The only username the stub accepts.
pub const MOCK_USERNAME: &str = "user1";
/// Account the stub user is logged into.
pub const MOCK_ACCOUNT_ID: AccountId = 1;
pub const MOCK_TOKEN: &str = "mock-jwt-token";

/// In-process stand-in for the real server.
///
/// Combines a `TransferEngine` and a `QueryService` over one ledger, and can
/// delay every call to mimic network latency.
#[derive(Clone)]
pub struct MockBackend {
    engine: TransferEngine,
    queries: QueryService,
    latency: Duration,
}

impl MockBackend {
    pub fn new(store: InMemoryLedgerStore) -> Self {
        Self {
            engine: TransferEngine::new(store.clone()),
            queries: QueryService::new(store),
            latency: Duration::ZERO,
        }
    }

    /// A backend over the development seed accounts.
    pub fn seeded() -> Self {
        Self::new(InMemoryLedgerStore::seeded())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &InMemoryLedgerStore {
        self.engine.store()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl TransferExecutor for MockBackend {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        self.simulate_latency().await;

        if request.username != MOCK_USERNAME || request.password.is_empty() {
            info!(username = %request.username, "login refused");
            return Err(TransferError::Unauthorized);
        }

        let account = self.queries.get_account(MOCK_ACCOUNT_ID).await?;
        info!(username = %request.username, account = account.id, "login accepted");
        Ok(LoginResponse {
            token: MOCK_TOKEN.to_string(),
            account_id: account.id,
            holder_name: account.holder_name,
        })
    }

    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        self.simulate_latency().await;
        self.engine.transfer(request).await
    }

    async fn account(&self, id: AccountId) -> Result<Account> {
        self.simulate_latency().await;
        debug!(account = id, "get account");
        self.queries.get_account(id).await
    }

    async fn balance(&self, id: AccountId) -> Result<Balance> {
        self.simulate_latency().await;
        debug!(account = id, "get balance");
        self.queries.get_balance(id).await
    }

    async fn transactions(&self, id: AccountId) -> Result<Vec<TransactionRecord>> {
        self.simulate_latency().await;
        debug!(account = id, "get transactions");
        self.queries.get_transactions(id).await
    }
}
