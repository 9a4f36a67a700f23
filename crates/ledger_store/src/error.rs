use std::io;

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for `Result<T, ledger_store::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents all the ways a store, dispatch or query can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The command or event was rejected by the bank account aggregate.
    #[error(transparent)]
    Decision(#[from] ledger::Error),
    /// Unable to serialize event.
    #[error("failed to serialize event: {0}")]
    SerializeEvent(serde_json::Error),
    /// A stored record failed to deserialize.
    #[error("failed to deserialize record: {0}")]
    DeserializeRecord(serde_json::Error),
    /// An IO error.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Read write lock error.
    #[error("could not get read/write lock")]
    RwPoison,
    /// The streams changed since they were loaded.
    #[error("wrong expected version: {expected:?} (actual version: {actual:?})")]
    WrongExpectedVersion {
        /// Version the writer loaded.
        expected: Option<u64>,
        /// Version found when appending.
        actual: Option<u64>,
    },
    /// A query range ends before it starts.
    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// First day of the range.
        from: NaiveDate,
        /// Last day of the range.
        to: NaiveDate,
    },
}
