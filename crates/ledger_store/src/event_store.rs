//! Event store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger::{AccountId, Event, EventType, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Used to store & load events.
///
/// The log is append-only and totally ordered by position.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Loads every event referencing at least one of `account_ids`, in log
    /// order.
    ///
    /// An empty slice loads nothing.
    async fn load_events(&self, account_ids: &[AccountId]) -> Result<Vec<RecordedEvent>>;

    /// Loads the whole log.
    async fn load_all(&self) -> Result<Vec<RecordedEvent>>;

    /// Position of the latest event referencing any of `account_ids`.
    async fn version(&self, account_ids: &[AccountId]) -> Result<Option<u64>> {
        Ok(self
            .load_events(account_ids)
            .await?
            .last()
            .map(|record| record.position))
    }

    /// Appends events in order.
    ///
    /// Fails with [`Error::WrongExpectedVersion`] when the streams referenced
    /// by `events` have moved past `expected_version`. Nothing is written
    /// in that case.
    async fn append(
        &self,
        expected_version: Option<u64>,
        events: &[Event],
    ) -> Result<Vec<RecordedEvent>>;

    /// Loads the history of `account_ids` and folds it into a state.
    async fn load_state(&self, account_ids: &[AccountId]) -> Result<State> {
        let records = self.load_events(account_ids).await?;
        project_records(&records)
    }
}

/// A stored event with additional metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Position in the global log, starting from 0.
    pub position: u64,
    /// Accounts whose streams contain this event.
    pub account_ids: Vec<AccountId>,
    /// Event type name.
    pub event_type: String,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event data.
    pub data: Value,
}

impl RecordedEvent {
    /// Encodes an event to be stored at `position`.
    pub fn encode(position: u64, event: &Event) -> Result<Self> {
        Ok(RecordedEvent {
            position,
            account_ids: event.account_ids(),
            event_type: event.event_type().to_string(),
            occurred_at: event.occurred_at,
            data: event.payload.data().map_err(Error::SerializeEvent)?,
        })
    }

    /// Decodes the stored data back into an event.
    pub fn decode(&self) -> Result<Event> {
        Ok(Event::decode(
            &self.event_type,
            self.occurred_at,
            self.data.clone(),
        )?)
    }

    /// Whether the record belongs to any of the given streams.
    pub fn references_any(&self, account_ids: &[AccountId]) -> bool {
        self.account_ids.iter().any(|id| account_ids.contains(id))
    }
}

/// Decodes and folds records into a state.
pub fn project_records(records: &[RecordedEvent]) -> Result<State> {
    let events = records
        .iter()
        .map(RecordedEvent::decode)
        .collect::<Result<Vec<_>>>()?;
    Ok(ledger::project(&events)?)
}
