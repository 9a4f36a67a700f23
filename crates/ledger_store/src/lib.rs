//! Event stores, a command dispatcher and read-side queries for
//! [ledger](../ledger) bank accounts.
//!
//! Events live in a single append-only log. Each record remembers which
//! accounts it references, so the history of one account (its stream) is the
//! subsequence of records referencing it.

#![deny(missing_docs)]

pub use dispatcher::*;
pub use error::{Error, Result};
pub use event_store::*;
pub use file::FlatFileEventStore;
pub use memory::InMemoryEventStore;
pub use query::*;

mod dispatcher;
mod error;
mod event_store;
mod file;
mod memory;
mod query;
