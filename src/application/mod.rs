//! Application layer containing the transfer and query use cases.
//!
//! `TransferEngine` is the only writer of the ledger; `QueryService` reads it.
//! Both share one `InMemoryLedgerStore`.

pub mod engine;
pub mod query;
