//! Domain types: accounts, the ledger, transaction records and the executor port.

pub mod account;
pub mod ledger;
pub mod ports;
pub mod transaction;
pub mod transfer;
