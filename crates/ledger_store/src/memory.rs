use std::sync::RwLock;

use async_trait::async_trait;
use ledger::{AccountId, Event};
use tracing::trace;

use crate::{Error, EventStore, RecordedEvent, Result};

/// An in memory event store.
///
/// This is useful for testing, but is not recommended
/// for production as the data does not persist to disk.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<RecordedEvent>>,
}

impl InMemoryEventStore {
    /// Creates a store holding previously recorded events.
    pub fn from_records(records: Vec<RecordedEvent>) -> Self {
        InMemoryEventStore {
            events: RwLock::new(records),
        }
    }

    /// Number of stored events.
    pub fn len(&self) -> Result<usize> {
        Ok(self.events.read().map_err(|_| Error::RwPoison)?.len())
    }

    /// Whether no event has been stored.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    pub(crate) fn read(&self, account_ids: &[AccountId]) -> Result<Vec<RecordedEvent>> {
        let events_lock = self.events.read().map_err(|_| Error::RwPoison)?;

        Ok(events_lock
            .iter()
            .filter(|record| record.references_any(account_ids))
            .cloned()
            .collect())
    }

    pub(crate) fn read_all(&self) -> Result<Vec<RecordedEvent>> {
        let events_lock = self.events.read().map_err(|_| Error::RwPoison)?;
        Ok(events_lock.clone())
    }

    /// Checks the expected version, encodes `events` and hands them to
    /// `persist` before adding them to the log. Nothing is added if `persist`
    /// fails.
    pub(crate) fn write<F>(
        &self,
        expected_version: Option<u64>,
        events: &[Event],
        persist: F,
    ) -> Result<Vec<RecordedEvent>>
    where
        F: FnOnce(&[RecordedEvent]) -> Result<()>,
    {
        if events.is_empty() {
            return Ok(vec![]);
        }

        let account_ids: Vec<AccountId> = events.iter().flat_map(Event::account_ids).collect();

        let mut events_lock = self.events.write().map_err(|_| Error::RwPoison)?;

        let actual = events_lock
            .iter()
            .rev()
            .find(|record| record.references_any(&account_ids))
            .map(|record| record.position);
        if actual != expected_version {
            return Err(Error::WrongExpectedVersion {
                expected: expected_version,
                actual,
            });
        }

        let first_position = events_lock.len() as u64;
        let records = events
            .iter()
            .enumerate()
            .map(|(index, event)| RecordedEvent::encode(first_position + index as u64, event))
            .collect::<Result<Vec<_>>>()?;
        persist(&records)?;

        events_lock.extend(records.iter().cloned());
        trace!(first_position, count = records.len(), "appended events");

        Ok(records)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load_events(&self, account_ids: &[AccountId]) -> Result<Vec<RecordedEvent>> {
        self.read(account_ids)
    }

    async fn load_all(&self) -> Result<Vec<RecordedEvent>> {
        self.read_all()
    }

    async fn append(
        &self,
        expected_version: Option<u64>,
        events: &[Event],
    ) -> Result<Vec<RecordedEvent>> {
        self.write(expected_version, events, |_| Ok(()))
    }
}
