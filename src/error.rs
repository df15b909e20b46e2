use crate::domain::account::{AccountId, AccountStatus, Amount, Balance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransferError>;

/// Which side of a transfer an account is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Source,
    Destination,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Source => f.write_str("source"),
            AccountRole::Destination => f.write_str("destination"),
        }
    }
}

/// Every way a request can be refused.
///
/// The first eight variants are the transfer rejections, in the order they
/// are checked. None of them leaves the ledger modified.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("accounts must differ")]
    SameAccount,
    #[error("{0} account {1} not found")]
    AccountNotFound(AccountRole, AccountId),
    #[error("{0} account {1} not active ({2})")]
    AccountNotActive(AccountRole, AccountId, AccountStatus),
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("duplicate transfer request")]
    DuplicateRequest,
    #[error("insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Balance,
        requested: Amount,
    },
    #[error("account {0} not found")]
    UnknownAccount(AccountId),
    #[error("invalid username or password")]
    Unauthorized,
    #[error("remote error {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Classification of a [`TransferError`], shared by local and remote errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    InsufficientFunds,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VAL-422",
            ErrorKind::NotFound => "ACC-404",
            ErrorKind::Forbidden => "ACC-403",
            ErrorKind::Conflict => "TRX-409",
            ErrorKind::InsufficientFunds => "TRX-400",
            ErrorKind::Unauthorized => "AUTH-401",
            ErrorKind::Internal => "SYS-500",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            ErrorKind::Validation => 422,
            ErrorKind::NotFound => 404,
            ErrorKind::Forbidden => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::InsufficientFunds => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Internal => 500,
        }
    }

    /// Best guess for a status that came without an error body. A bare 400
    /// says nothing about funds, so it is not mapped.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::Validation,
            _ => ErrorKind::Internal,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::Forbidden,
            ErrorKind::Conflict,
            ErrorKind::InsufficientFunds,
            ErrorKind::Unauthorized,
            ErrorKind::Internal,
        ]
        .into_iter()
        .find(|kind| kind.code() == code)
    }
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::SameAccount | TransferError::NonPositiveAmount(_) => {
                ErrorKind::Validation
            }
            TransferError::AccountNotFound(..) | TransferError::UnknownAccount(_) => {
                ErrorKind::NotFound
            }
            TransferError::AccountNotActive(..) => ErrorKind::Forbidden,
            TransferError::DuplicateRequest => ErrorKind::Conflict,
            TransferError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            TransferError::Unauthorized => ErrorKind::Unauthorized,
            TransferError::Remote { status, code, .. } => {
                ErrorKind::from_code(code).unwrap_or_else(|| ErrorKind::from_status(*status))
            }
            TransferError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, e.g. `TRX-409`.
    pub fn code(&self) -> String {
        match self {
            TransferError::Remote { code, .. } => code.clone(),
            other => other.kind().code().to_string(),
        }
    }

    /// Suggested HTTP status when the error crosses a transport.
    pub fn status(&self) -> u16 {
        match self {
            TransferError::Remote { status, .. } => *status,
            other => other.kind().status(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TransferError::Internal(Box::new(err))
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::internal(err)
    }
}

impl From<csv::Error> for TransferError {
    fn from(err: csv::Error) -> Self {
        TransferError::internal(err)
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(err: serde_json::Error) -> Self {
        TransferError::internal(err)
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(err: reqwest::Error) -> Self {
        TransferError::internal(err)
    }
}

/// Error body exchanged with the server.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl From<&TransferError> for ErrorResponse {
    fn from(err: &TransferError) -> Self {
        let message = match err {
            TransferError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            error_code: err.code(),
            message,
        }
    }
}

impl ErrorResponse {
    /// Rebuilds the error a server reported with `status`.
    pub fn into_error(self, status: u16) -> TransferError {
        if status == 401 {
            return TransferError::Unauthorized;
        }
        TransferError::Remote {
            status,
            code: self.error_code,
            message: self.message,
        }
    }
}
