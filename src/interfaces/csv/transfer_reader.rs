use crate::domain::account::AccountId;
use crate::domain::transfer::TransferRequest;
use crate::error::{Result, TransferError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct TransferRow {
    from: AccountId,
    to: AccountId,
    amount: Decimal,
    #[serde(default)]
    idempotency_key: Option<String>,
}

impl From<TransferRow> for TransferRequest {
    fn from(row: TransferRow) -> Self {
        Self {
            from_account_id: row.from,
            to_account_id: row.to,
            amount: row.amount,
            idempotency_key: row.idempotency_key.filter(|k| !k.is_empty()),
        }
    }
}

/// Reads transfer requests from a CSV source.
///
/// Expects the header `from, to, amount, idempotency_key`; the last column may
/// be empty or missing. Whitespace around fields is trimmed.
pub struct TransferReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransferReader<R> {
    /// Creates a new `TransferReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests, one
    /// `Result` per row, so a malformed row does not stop the stream.
    pub fn requests(self) -> impl Iterator<Item = Result<TransferRequest>> {
        self.reader
            .into_deserialize::<TransferRow>()
            .map(|result| result.map(TransferRequest::from).map_err(TransferError::from))
    }
}
