use rust_decimal::Decimal;

use crate::{
    AccountClosed, AccountId, AccountOpened, BankAccount, CashDeposited, CashTransferred,
    CashWithdrawn, Command, Context, Error, Event, Result, State,
};

pub(crate) fn decide(ctx: &Context, command: Command, state: &State) -> Result<Vec<Event>> {
    let now = ctx.now();

    match command {
        Command::OpenBankAccount { initial_amount } => {
            if initial_amount < Decimal::ZERO {
                return Err(Error::InvalidAmount(initial_amount));
            }

            let account_id = ctx.next_id();
            Ok(vec![
                Event::new(now, AccountOpened { account_id }),
                Event::new(
                    now,
                    CashDeposited {
                        account_id,
                        amount: initial_amount,
                    },
                ),
            ])
        }
        Command::DepositCash { account_id, amount } => {
            ensure_positive(amount)?;
            let account = open_account(state, &account_id)?;
            ensure_room(account, amount)?;

            Ok(vec![Event::new(now, CashDeposited { account_id, amount })])
        }
        Command::WithdrawCash { account_id, amount } => {
            ensure_positive(amount)?;
            let account = open_account(state, &account_id)?;
            ensure_covers(account, amount)?;

            Ok(vec![Event::new(now, CashWithdrawn { account_id, amount })])
        }
        Command::TransferCash {
            from_account_id,
            to_account_id,
            amount,
        } => {
            if from_account_id == to_account_id {
                return Err(Error::SameAccountTransfer(from_account_id));
            }
            ensure_positive(amount)?;
            let from = open_account(state, &from_account_id)?;
            let to = open_account(state, &to_account_id)?;
            ensure_covers(from, amount)?;
            ensure_room(to, amount)?;

            Ok(vec![
                Event::new(
                    now,
                    CashWithdrawn {
                        account_id: from_account_id,
                        amount,
                    },
                ),
                Event::new(
                    now,
                    CashDeposited {
                        account_id: to_account_id,
                        amount,
                    },
                ),
                Event::new(
                    now,
                    CashTransferred {
                        from_account_id,
                        to_account_id,
                        amount,
                    },
                ),
            ])
        }
        Command::CloseBankAccount { account_id } => {
            let balance = open_account(state, &account_id)?.balance;

            Ok(vec![
                Event::new(
                    now,
                    CashWithdrawn {
                        account_id,
                        amount: balance,
                    },
                ),
                Event::new(now, AccountClosed { account_id }),
            ])
        }
        command @ (Command::CheckBalanceAccount { .. } | Command::CheckAccountHistory { .. }) => {
            Err(Error::unsupported_command(command.kind()))
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
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

fn ensure_covers(account: &BankAccount, amount: Decimal) -> Result<()> {
    if account.balance < amount {
        return Err(Error::InsufficientFunds {
            account_id: account.id,
            balance: account.balance,
            requested: amount,
        });
    }

    Ok(())
}

fn ensure_room(account: &BankAccount, amount: Decimal) -> Result<()> {
    if account.balance.checked_add(amount).is_none() {
        return Err(Error::BalanceOverflow {
            account_id: account.id,
            amount,
        });
    }

    Ok(())
}
