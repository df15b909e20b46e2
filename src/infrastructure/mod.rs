//! Implementations of the storage and executor ports.

pub mod in_memory;
pub mod mock;
pub mod remote;
