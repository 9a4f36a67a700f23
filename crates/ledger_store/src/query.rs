//! Read side for the query-shaped commands.

use chrono::{DateTime, NaiveDate, Utc};
use ledger::{AccountId, EventPayload};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{project_records, Error, EventStore, RecordedEvent, Result};

/// A single line of an account statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Position in the global log.
    pub position: u64,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// The event.
    pub event: EventPayload,
}

/// Balance of an account as of the end of a day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// Account reported on.
    pub account_id: AccountId,
    /// Balance at the end of `until`.
    pub balance: Decimal,
    /// Last day included.
    pub until: NaiveDate,
    /// Deposits up to `until`, empty unless requested.
    pub deposits: Vec<Entry>,
    /// Withdrawals up to `until`, empty unless requested.
    pub withdrawals: Vec<Entry>,
}

/// Answer to a query command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResult {
    /// Answer to `CheckBalanceAccount`.
    Balance(BalanceReport),
    /// Answer to `CheckAccountHistory`.
    History(Vec<Entry>),
}

/// Reports the balance of an account as of the end of `show_until`,
/// optionally listing deposits and withdrawals.
///
/// Fails with [`ledger::Error::AccountNotFound`] if the account was not
/// opened by then.
pub async fn check_balance<ES>(
    store: &ES,
    account_id: AccountId,
    show_deposits: bool,
    show_withdrawals: bool,
    show_until: NaiveDate,
) -> Result<BalanceReport>
where
    ES: EventStore + ?Sized,
{
    let records: Vec<_> = store
        .load_events(&[account_id])
        .await?
        .into_iter()
        // The log is cut at the first record past the day so the projection
        // stays a prefix of the stream.
        .take_while(|record| record.occurred_at.date_naive() <= show_until)
        .collect();

    let state = project_records(&records)?;
    let balance = state.account(&account_id)?.balance;

    let mut deposits = Vec::new();
    let mut withdrawals = Vec::new();
    for entry in entries(&records)? {
        match &entry.event {
            EventPayload::CashDeposited(deposited)
                if show_deposits && deposited.account_id == account_id =>
            {
                deposits.push(entry)
            }
            EventPayload::CashWithdrawn(withdrawn)
                if show_withdrawals && withdrawn.account_id == account_id =>
            {
                withdrawals.push(entry)
            }
            _ => {}
        }
    }

    Ok(BalanceReport {
        account_id,
        balance,
        until: show_until,
        deposits,
        withdrawals,
    })
}

/// Lists every event referencing an account that occurred between `from`
/// and `to`, both days included.
pub async fn account_history<ES>(
    store: &ES,
    account_id: AccountId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Entry>>
where
    ES: EventStore + ?Sized,
{
    if from > to {
        return Err(Error::InvalidDateRange { from, to });
    }

    let records = store.load_events(&[account_id]).await?;
    if records.is_empty() {
        return Err(ledger::Error::AccountNotFound(account_id).into());
    }

    let in_range: Vec<_> = records
        .into_iter()
        .filter(|record| {
            let day = record.occurred_at.date_naive();
            from <= day && day <= to
        })
        .collect();

    entries(&in_range)
}

fn entries(records: &[RecordedEvent]) -> Result<Vec<Entry>> {
    records
        .iter()
        .map(|record| {
            Ok(Entry {
                position: record.position,
                occurred_at: record.occurred_at,
                event: record.decode()?.payload,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ledger::{AccountOpened, CashDeposited, CashWithdrawn, Event};
    use uuid::Uuid;

    use super::*;
    use crate::InMemoryEventStore;

    fn on(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn balance_stops_at_first_record_past_the_day() -> Result<()> {
        let account_id = AccountId::from_uuid(Uuid::from_u128(1));
        let store = InMemoryEventStore::default();
        store
            .append(None, &[Event::new(on(1), AccountOpened { account_id })])
            .await?;
        store
            .append(
                Some(0),
                &[Event::new(
                    on(3),
                    CashDeposited {
                        account_id,
                        amount: Decimal::TEN,
                    },
                )],
            )
            .await?;
        // Recorded after the deposit, stamped a day earlier.
        store
            .append(
                Some(1),
                &[Event::new(
                    on(2),
                    CashWithdrawn {
                        account_id,
                        amount: Decimal::TEN,
                    },
                )],
            )
            .await?;

        let until = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let report = check_balance(&store, account_id, true, true, until).await?;
        assert_eq!(report.balance, Decimal::ZERO);
        assert!(report.withdrawals.is_empty());

        Ok(())
    }
}
