use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::AccountId;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh account identities.
pub trait IdGenerator: Send + Sync {
    /// Returns an id never returned before.
    fn next_id(&self) -> AccountId;
}

/// Wall clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> AccountId {
        AccountId::from_uuid(Uuid::new_v4())
    }
}

/// UUIDs built from an incrementing counter, starting at 1.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose first id is built from `start`.
    pub fn starting_at(start: u64) -> Self {
        SequentialIdGenerator {
            next: AtomicU64::new(start.saturating_sub(1)),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> AccountId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        AccountId::from_uuid(Uuid::from_u128(n as u128))
    }
}

/// Capabilities a decision may use besides the command and state.
pub struct Context {
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl Context {
    /// Creates a context from a clock and an id generator.
    pub fn new(clock: impl Clock + 'static, ids: impl IdGenerator + 'static) -> Self {
        Context {
            clock: Box::new(clock),
            ids: Box::new(ids),
        }
    }

    /// Wall clock time and random ids.
    pub fn system() -> Self {
        Context::new(SystemClock, RandomIdGenerator)
    }

    /// Current time according to the clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A fresh account id.
    pub fn next_id(&self) -> AccountId {
        self.ids.next_id()
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::system()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
