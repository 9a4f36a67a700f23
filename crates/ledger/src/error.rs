use rust_decimal::Decimal;
use thiserror::Error;

use crate::AccountId;

/// Type alias for `Result<T, ledger::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents all the ways a decision or evolution can fail.
///
/// Errors are never retryable: they mean the caller sent the wrong input or
/// worked against stale state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The command has no decision rule for a bank account.
    #[error("{command} cannot be handled for bank account")]
    UnsupportedCommand {
        /// Name of the command kind.
        command: String,
    },
    /// The event has no evolution rule for a bank account.
    #[error("{event} cannot be evolved for bank account")]
    UnsupportedEvent {
        /// Name of the event type.
        event: String,
    },
    /// The account is not present in state.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),
    /// An account with the same id was already opened.
    #[error("account {0} already exists")]
    AccountAlreadyExists(AccountId),
    /// The account is closed and cannot change anymore.
    #[error("account {0} is closed")]
    AccountClosed(AccountId),
    /// The amount is negative, or zero where a positive amount is required.
    #[error("invalid amount {0}")]
    InvalidAmount(Decimal),
    /// The account balance does not cover the requested amount.
    #[error("insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account being debited.
        account_id: AccountId,
        /// Balance at the time of the request.
        balance: Decimal,
        /// Amount requested.
        requested: Decimal,
    },
    /// Crediting the account would exceed the largest representable balance.
    #[error("balance of account {account_id} would overflow when adding {amount}")]
    BalanceOverflow {
        /// Account being credited.
        account_id: AccountId,
        /// Amount that did not fit.
        amount: Decimal,
    },
    /// Source and destination of a transfer are the same account.
    #[error("cannot transfer from account {0} to itself")]
    SameAccountTransfer(AccountId),
    /// Command payload failed to deserialize.
    #[error("failed to deserialize command: {0}")]
    DeserializeCommand(String),
    /// Event payload failed to deserialize.
    #[error("failed to deserialize event: {0}")]
    DeserializeEvent(String),
}

impl Error {
    pub(crate) fn unsupported_command(command: impl Into<String>) -> Self {
        Error::UnsupportedCommand {
            command: command.into(),
        }
    }

    pub(crate) fn unsupported_event(event: impl Into<String>) -> Self {
        Error::UnsupportedEvent {
            event: event.into(),
        }
    }

    /// Stable machine readable code.
    pub fn code(&self) -> &'static str {
        use Error::*;

        match self {
            UnsupportedCommand { .. } => "UNSUPPORTED_COMMAND",
            UnsupportedEvent { .. } => "UNSUPPORTED_EVENT",
            AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AccountAlreadyExists(_) => "ACCOUNT_ALREADY_EXISTS",
            AccountClosed(_) => "ACCOUNT_CLOSED",
            InvalidAmount(_) => "INVALID_AMOUNT",
            InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            BalanceOverflow { .. } => "BALANCE_OVERFLOW",
            SameAccountTransfer(_) => "SAME_ACCOUNT_TRANSFER",
            DeserializeCommand(_) => "DESERIALIZE_COMMAND",
            DeserializeEvent(_) => "DESERIALIZE_EVENT",
        }
    }
}
