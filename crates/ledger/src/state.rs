use im::OrdMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, BankAccount, Error, Result};

/// Bank accounts keyed by their id.
///
/// State is a value: evolving it returns a new state and leaves the previous
/// one untouched. Clones share structure, so keeping old states around is
/// cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    accounts: OrdMap<AccountId, BankAccount>,
}

impl State {
    /// State before any event has been applied.
    pub fn empty() -> Self {
        State::default()
    }

    /// Returns the account with the given id, if present.
    pub fn get(&self, id: &AccountId) -> Option<&BankAccount> {
        self.accounts.get(id)
    }

    /// Returns the account with the given id.
    ///
    /// Fails with [`Error::AccountNotFound`] when the id is absent.
    pub fn account(&self, id: &AccountId) -> Result<&BankAccount> {
        self.get(id).ok_or(Error::AccountNotFound(*id))
    }

    /// Whether an account with the given id is present.
    pub fn contains(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Iterates over accounts ordered by id.
    pub fn accounts(&self) -> impl Iterator<Item = &BankAccount> {
        self.accounts.values()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account has been opened.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances.
    pub fn total_balance(&self) -> Decimal {
        self.accounts().map(|account| account.balance).sum()
    }

    pub(crate) fn with_account(&self, account: BankAccount) -> Self {
        State {
            accounts: self.accounts.update(account.id, account),
        }
    }
}

impl FromIterator<BankAccount> for State {
    fn from_iter<T: IntoIterator<Item = BankAccount>>(iter: T) -> Self {
        State {
            accounts: iter
                .into_iter()
                .map(|account| (account.id, account))
                .collect(),
        }
    }
}
