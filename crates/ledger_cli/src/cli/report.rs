use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use ledger::{AccountId, Command, EventPayload};
use ledger_store::{BalanceReport, Entry, EventStore, QueryResult};
use owo_colors::AnsiColors;

use super::LedgerDispatcher;
use crate::terminal::Terminal;

/// Show the balance of an account
#[derive(Args, Clone, Debug)]
pub struct Balance {
    /// Account to report on
    account_id: AccountId,
    /// List deposits
    #[arg(long)]
    deposits: bool,
    /// List withdrawals
    #[arg(long)]
    withdrawals: bool,
    /// Last day included, defaults to today
    #[arg(long)]
    until: Option<NaiveDate>,
}

impl Balance {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let result = dispatcher
            .query(Command::CheckBalanceAccount {
                account_id: self.account_id,
                show_deposits: self.deposits,
                show_withdrawals: self.withdrawals,
                show_until: self.until.unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        print_result(terminal, result)
    }
}

/// List the events of an account between two dates
#[derive(Args, Clone, Debug)]
pub struct History {
    /// Account to report on
    account_id: AccountId,
    /// First day included, defaults to the beginning of time
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day included, defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl History {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let result = dispatcher
            .query(Command::CheckAccountHistory {
                account_id: self.account_id,
                from: self.from.unwrap_or(NaiveDate::MIN),
                to: self.to.unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        print_result(terminal, result)
    }
}

/// Dump the whole event log
#[derive(Args, Clone, Debug)]
pub struct Events {}

impl Events {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let records = dispatcher.store().load_all().await?;
        for record in &records {
            terminal.line(
                format!(
                    "#{:<6}{}  {:<16}{}",
                    record.position,
                    record.occurred_at.to_rfc3339(),
                    record.event_type,
                    record.data
                ),
                None,
            )?;
        }
        terminal.status("Listed", format!("{} events", records.len()))
    }
}

pub(super) fn print_result(terminal: &Terminal, result: QueryResult) -> Result<()> {
    match result {
        QueryResult::Balance(report) => print_balance(terminal, &report),
        QueryResult::History(entries) => {
            for entry in &entries {
                print_entry(terminal, entry)?;
            }
            terminal.status("Listed", format!("{} events", entries.len()))
        }
    }
}

fn print_balance(terminal: &Terminal, report: &BalanceReport) -> Result<()> {
    terminal.line(format!("{}  {}", report.account_id, report.balance), None)?;
    for entry in report.deposits.iter().chain(&report.withdrawals) {
        print_entry(terminal, entry)?;
    }

    Ok(())
}

fn print_entry(terminal: &Terminal, entry: &Entry) -> Result<()> {
    let (label, amount, color) = match &entry.event {
        EventPayload::AccountOpened(_) => ("opened", None, AnsiColors::Blue),
        EventPayload::CashDeposited(deposited) => {
            ("deposit", Some(deposited.amount), AnsiColors::Green)
        }
        EventPayload::CashWithdrawn(withdrawn) => {
            ("withdrawal", Some(withdrawn.amount), AnsiColors::Red)
        }
        EventPayload::CashTransferred(transferred) => {
            ("transfer", Some(transferred.amount), AnsiColors::Yellow)
        }
        EventPayload::AccountClosed(_) => ("closed", None, AnsiColors::Magenta),
    };

    let date = entry.occurred_at.date_naive();
    match amount {
        Some(amount) => terminal.line(
            format!("#{:<6}{date}  {label:<12}{amount}", entry.position),
            Some(color),
        ),
        None => terminal.line(
            format!("#{:<6}{date}  {label}", entry.position),
            Some(color),
        ),
    }
}
