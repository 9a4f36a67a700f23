use anyhow::Result;
use clap::Args;
use ledger::{AccountId, Command};
use rust_decimal::Decimal;

use super::{print_recorded, LedgerDispatcher};
use crate::terminal::Terminal;

/// Open an account with an initial deposit
#[derive(Args, Clone, Debug)]
pub struct Open {
    /// Amount deposited right after opening
    initial_amount: Decimal,
}

impl Open {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher
            .execute(Command::OpenBankAccount {
                initial_amount: self.initial_amount,
            })
            .await?;

        if let Some(account_id) = records.first().and_then(|record| record.account_ids.first()) {
            terminal.status("Opened", format!("account {account_id}"))?;
        }
        print_recorded(terminal, &records)
    }
}

/// Deposit cash into an account
#[derive(Args, Clone, Debug)]
pub struct Deposit {
    /// Account to credit
    account_id: AccountId,
    /// Amount to deposit
    amount: Decimal,
}

impl Deposit {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher
            .execute(Command::DepositCash {
                account_id: self.account_id,
                amount: self.amount,
            })
            .await?;

        terminal.status("Deposited", format!("{} into {}", self.amount, self.account_id))?;
        print_recorded(terminal, &records)
    }
}

/// Withdraw cash from an account
#[derive(Args, Clone, Debug)]
pub struct Withdraw {
    /// Account to debit
    account_id: AccountId,
    /// Amount to withdraw
    amount: Decimal,
}

impl Withdraw {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher
            .execute(Command::WithdrawCash {
                account_id: self.account_id,
                amount: self.amount,
            })
            .await?;

        terminal.status("Withdrew", format!("{} from {}", self.amount, self.account_id))?;
        print_recorded(terminal, &records)
    }
}

/// Transfer cash between two accounts
#[derive(Args, Clone, Debug)]
pub struct Transfer {
    /// Account to debit
    from_account_id: AccountId,
    /// Account to credit
    to_account_id: AccountId,
    /// Amount to move
    amount: Decimal,
}

impl Transfer {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher
            .execute(Command::TransferCash {
                from_account_id: self.from_account_id,
                to_account_id: self.to_account_id,
                amount: self.amount,
            })
            .await?;

        terminal.status(
            "Transferred",
            format!(
                "{} from {} to {}",
                self.amount, self.from_account_id, self.to_account_id
            ),
        )?;
        print_recorded(terminal, &records)
    }
}

/// Withdraw the remaining balance and close an account
#[derive(Args, Clone, Debug)]
pub struct Close {
    /// Account to close
    account_id: AccountId,
}

impl Close {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher
            .execute(Command::CloseBankAccount {
                account_id: self.account_id,
            })
            .await?;

        terminal.status("Closed", format!("account {}", self.account_id))?;
        print_recorded(terminal, &records)
    }
}
