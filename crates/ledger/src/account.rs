use std::{fmt, str};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity of a bank account.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wraps an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        AccountId(id)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        AccountId(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(AccountId)
    }
}

/// A bank account as projected from its events.
///
/// Accounts are never stored directly, they only exist inside a
/// [`State`](crate::State) rebuilt from history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Account identity.
    pub id: AccountId,
    /// Current balance, never negative.
    pub balance: Decimal,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
    /// When the account was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
}

impl BankAccount {
    /// Creates an open account with a zero balance.
    pub fn open(id: AccountId, created_at: DateTime<Utc>) -> Self {
        BankAccount {
            id,
            balance: Decimal::ZERO,
            created_at,
            closed_at: None,
        }
    }

    /// Whether the account has been closed.
    ///
    /// A closed account is terminal.
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}
