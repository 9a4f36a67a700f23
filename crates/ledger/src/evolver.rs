use rust_decimal::Decimal;

use crate::{
    AccountClosed, AccountId, AccountOpened, BankAccount, CashDeposited, CashWithdrawn, Error,
    Event, EventPayload, Result, State,
};

pub(crate) fn evolve(event: &Event, state: &State) -> Result<State> {
    match &event.payload {
        EventPayload::AccountOpened(AccountOpened { account_id }) => {
            if state.contains(account_id) {
                return Err(Error::AccountAlreadyExists(*account_id));
            }

            Ok(state.with_account(BankAccount::open(*account_id, event.occurred_at)))
        }
        EventPayload::CashDeposited(CashDeposited { account_id, amount }) => {
            ensure_not_negative(*amount)?;
            let account = open_account(state, account_id)?;
            let balance = account
                .balance
                .checked_add(*amount)
                .ok_or(Error::BalanceOverflow {
                    account_id: *account_id,
                    amount: *amount,
                })?;

            Ok(state.with_account(BankAccount {
                balance,
                ..account.clone()
            }))
        }
        EventPayload::CashWithdrawn(CashWithdrawn { account_id, amount }) => {
            ensure_not_negative(*amount)?;
            let account = open_account(state, account_id)?;
            if account.balance < *amount {
                return Err(Error::InsufficientFunds {
                    account_id: *account_id,
                    balance: account.balance,
                    requested: *amount,
                });
            }
            let balance = account.balance - *amount;

            Ok(state.with_account(BankAccount {
                balance,
                ..account.clone()
            }))
        }
        // Balances already moved with the paired withdrawal and deposit.
        EventPayload::CashTransferred(_) => Ok(state.clone()),
        EventPayload::AccountClosed(AccountClosed { account_id }) => {
            let account = open_account(state, account_id)?;

            Ok(state.with_account(BankAccount {
                closed_at: Some(event.occurred_at),
                ..account.clone()
            }))
        }
    }
}

// Zero is allowed: closing an empty account sweeps a zero withdrawal.
fn ensure_not_negative(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(())
}

fn open_account<'a>(state: &'a State, account_id: &AccountId) -> Result<&'a BankAccount> {
    let account = state.account(account_id)?;
    if account.is_closed() {
        return Err(Error::AccountClosed(*account_id));
    }

    Ok(account)
}
