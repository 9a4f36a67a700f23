use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ledger::{AccountId, Event};
use tracing::debug;

use crate::{Error, EventStore, InMemoryEventStore, RecordedEvent, Result};

/// In-memory event store persisted to a file, one JSON record per line.
#[derive(Debug)]
pub struct FlatFileEventStore {
    event_store: InMemoryEventStore,
    file_store: Mutex<File>,
}

impl FlatFileEventStore {
    /// Opens the file at `path`, creating it if missing, and loads every
    /// record it contains.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_store = fs::OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path.as_ref())?;

        let mut records = Vec::new();
        for line in io::BufReader::new(file_store.try_clone()?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecordedEvent =
                serde_json::from_str(&line).map_err(Error::DeserializeRecord)?;
            records.push(record);
        }
        debug!(path = %path.as_ref().display(), count = records.len(), "loaded event file");

        Ok(FlatFileEventStore {
            event_store: InMemoryEventStore::from_records(records),
            file_store: Mutex::new(file_store),
        })
    }

    fn append_records(file: &mut File, records: &[RecordedEvent]) -> Result<()> {
        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record).map_err(Error::SerializeEvent)?;
            buf.push(b'\n');
        }
        file.write_all(&buf)?;
        file.flush()?;

        Ok(())
    }
}

#[async_trait]
impl EventStore for FlatFileEventStore {
    async fn load_events(&self, account_ids: &[AccountId]) -> Result<Vec<RecordedEvent>> {
        self.event_store.read(account_ids)
    }

    async fn load_all(&self) -> Result<Vec<RecordedEvent>> {
        self.event_store.read_all()
    }

    async fn append(
        &self,
        expected_version: Option<u64>,
        events: &[Event],
    ) -> Result<Vec<RecordedEvent>> {
        // Holding the file lock keeps lines in log order.
        let mut file_guard = self.file_store.lock().map_err(|_| Error::RwPoison)?;
        self.event_store
            .write(expected_version, events, |records| {
                Self::append_records(&mut file_guard, records)
            })
    }
}
