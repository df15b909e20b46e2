//! CSV codecs used by the binary to load seed accounts and batches of transfers.

pub mod account_reader;
pub mod account_writer;
pub mod transfer_reader;
