use ledger::{AccountId, Command, Context, State};
use tracing::{debug, info, instrument};

use crate::{
    account_history, check_balance, project_records, EventStore, QueryResult, RecordedEvent, Result,
};

/// Executes commands against an event store.
///
/// Every write loads the history of the accounts a command touches, decides
/// on the projected state and appends the resulting events, expecting the
/// streams to still be at the version that was read.
#[derive(Debug)]
pub struct Dispatcher<ES> {
    store: ES,
    ctx: Context,
}

impl<ES> Dispatcher<ES>
where
    ES: EventStore,
{
    /// Creates a dispatcher with its own clock and id generator.
    pub fn new(store: ES, ctx: Context) -> Self {
        Dispatcher { store, ctx }
    }

    /// The underlying store.
    pub fn store(&self) -> &ES {
        &self.store
    }

    /// Decides and records a command, returning the appended events.
    ///
    /// Query commands are refused with
    /// [`ledger::Error::UnsupportedCommand`], use [`Dispatcher::query`].
    #[instrument(skip(self, command), fields(command = command.kind()))]
    pub async fn execute(&self, command: Command) -> Result<Vec<RecordedEvent>> {
        if command.is_query() {
            return Err(ledger::Error::UnsupportedCommand {
                command: command.kind().to_string(),
            }
            .into());
        }

        let history = self.store.load_events(&command.account_ids()).await?;
        let version = history.last().map(|record| record.position);
        let state = project_records(&history)?;
        debug!(?version, accounts = state.len(), "loaded state");

        let events = ledger::decide(&self.ctx, command, &state)?;
        let records = self.store.append(version, &events).await?;
        info!(count = records.len(), "recorded events");

        Ok(records)
    }

    /// Rebuilds the current state of the given accounts.
    pub async fn load_state(&self, account_ids: &[AccountId]) -> Result<State> {
        self.store.load_state(account_ids).await
    }

    /// Answers a query command.
    ///
    /// Write commands are refused with [`ledger::Error::UnsupportedCommand`].
    #[instrument(skip(self, command), fields(command = command.kind()))]
    pub async fn query(&self, command: Command) -> Result<QueryResult> {
        match command {
            Command::CheckBalanceAccount {
                account_id,
                show_deposits,
                show_withdrawals,
                show_until,
            } => check_balance(
                &self.store,
                account_id,
                show_deposits,
                show_withdrawals,
                show_until,
            )
            .await
            .map(QueryResult::Balance),
            Command::CheckAccountHistory { account_id, from, to } => {
                account_history(&self.store, account_id, from, to)
                    .await
                    .map(QueryResult::History)
            }
            command => Err(ledger::Error::UnsupportedCommand {
                command: command.kind().to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use ledger::{EventPayload, FixedClock, SequentialIdGenerator};
    use rust_decimal::Decimal;

    use super::*;
    use crate::{Error, InMemoryEventStore};

    fn dispatcher() -> Dispatcher<InMemoryEventStore> {
        Dispatcher::new(
            InMemoryEventStore::default(),
            Context::new(
                FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
                SequentialIdGenerator::default(),
            ),
        )
    }

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    async fn open(dispatcher: &Dispatcher<InMemoryEventStore>, amount: i64) -> AccountId {
        let records = dispatcher
            .execute(Command::OpenBankAccount {
                initial_amount: dec(amount),
            })
            .await
            .unwrap();
        records[0].account_ids[0]
    }

    #[tokio::test]
    async fn open_deposit_withdraw() -> Result<()> {
        let dispatcher = dispatcher();
        let account_id = open(&dispatcher, 100).await;

        dispatcher
            .execute(Command::DepositCash {
                account_id,
                amount: dec(50),
            })
            .await?;
        dispatcher
            .execute(Command::WithdrawCash {
                account_id,
                amount: dec(30),
            })
            .await?;

        let state = dispatcher.load_state(&[account_id]).await?;
        assert_eq!(state.account(&account_id)?.balance, dec(120));
        assert_eq!(dispatcher.store().load_events(&[account_id]).await?.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn transfer_lands_in_both_streams() -> Result<()> {
        let dispatcher = dispatcher();
        let from = open(&dispatcher, 80).await;
        let to = open(&dispatcher, 0).await;

        let records = dispatcher
            .execute(Command::TransferCash {
                from_account_id: from,
                to_account_id: to,
                amount: dec(30),
            })
            .await?;
        let kinds: Vec<_> = records.iter().map(|r| r.event_type.as_str()).collect();
        assert_eq!(kinds, ["CashWithdrawn", "CashDeposited", "CashTransferred"]);

        let to_stream = dispatcher.store().load_events(&[to]).await?;
        assert_eq!(to_stream.last().map(|r| r.position), Some(records[2].position));

        let state = dispatcher.load_state(&[from, to]).await?;
        assert_eq!(state.account(&from)?.balance, dec(50));
        assert_eq!(state.account(&to)?.balance, dec(30));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_command_writes_nothing() -> Result<()> {
        let dispatcher = dispatcher();
        let account_id = open(&dispatcher, 10).await;

        let err = dispatcher
            .execute(Command::WithdrawCash {
                account_id,
                amount: dec(11),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Decision(ledger::Error::InsufficientFunds { .. })
        ));
        assert_eq!(dispatcher.store().len()?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn queries_go_through_query() -> Result<()> {
        let dispatcher = dispatcher();
        let account_id = open(&dispatcher, 25).await;
        let until = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let command = Command::CheckBalanceAccount {
            account_id,
            show_deposits: true,
            show_withdrawals: false,
            show_until: until,
        };

        let err = dispatcher.execute(command.clone()).await.unwrap_err();
        assert_eq!(err.to_string(), "CheckBalanceAccount cannot be handled for bank account");

        match dispatcher.query(command).await? {
            QueryResult::Balance(report) => {
                assert_eq!(report.balance, dec(25));
                assert_eq!(report.deposits.len(), 1);
                assert!(matches!(
                    report.deposits[0].event,
                    EventPayload::CashDeposited(_)
                ));
            }
            other => panic!("unexpected result {other:?}"),
        }

        Ok(())
    }
}
