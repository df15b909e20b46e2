use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ports::TransferExecutor;
use crate::domain::transaction::TransactionRecord;
use crate::domain::transfer::{
    BalanceResponse, LoginRequest, LoginResponse, TransferReceipt, TransferRequest,
};
use crate::error::{ErrorKind, ErrorResponse, Result, TransferError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const LOGIN_PATH: &str = "api/auth/login";
const TRANSFERS_PATH: &str = "api/v1/transfers";

/// HTTP client for the real money transfer server.
///
/// A successful `login` stores the returned token, which is then sent as a
/// bearer token on every following request.
pub struct RemoteTransferClient {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl RemoteTransferClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Endpoint paths are resolved below `base_url`, whether or not it ends
    /// with a slash.
    pub fn with_client(mut base_url: Url, client: Client) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            token: RwLock::new(None),
        }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
            ..self
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(TransferError::internal)
    }

    fn account_path(id: AccountId, suffix: &str) -> String {
        format!("api/v1/accounts/{id}{suffix}")
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let request = self.authorized(self.client.get(url)).await;
        decode(request.send().await?).await
    }
}

/// Decodes a success body as `T`, or an error body as the matching `TransferError`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let code = status.as_u16();
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice::<ErrorResponse>(&bytes).unwrap_or_else(|_| {
        ErrorResponse {
            error_code: ErrorKind::from_status(code).code().to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        }
    });
    warn!(status = code, code = %body.error_code, message = %body.message, "server refused request");
    Err(body.into_error(code))
}

#[async_trait]
impl TransferExecutor for RemoteTransferClient {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response: LoginResponse =
            decode(self.client.post(url).json(&request).send().await?).await?;
        *self.token.write().await = Some(response.token.clone());
        Ok(response)
    }

    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        let url = self.endpoint(TRANSFERS_PATH)?;
        debug!(%url, from = request.from_account_id, to = request.to_account_id, "POST transfer");
        let builder = self.authorized(self.client.post(url).json(&request)).await;
        decode(builder.send().await?).await
    }

    async fn account(&self, id: AccountId) -> Result<Account> {
        self.get(&Self::account_path(id, "")).await
    }

    async fn balance(&self, id: AccountId) -> Result<Balance> {
        let response: BalanceResponse = self.get(&Self::account_path(id, "/balance")).await?;
        Ok(response.balance)
    }

    async fn transactions(&self, id: AccountId) -> Result<Vec<TransactionRecord>> {
        self.get(&Self::account_path(id, "/transactions")).await
    }
}
