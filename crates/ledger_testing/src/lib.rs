//! Testing utilities for [ledger](../ledger) aggregates.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use ledger::{Command, Context, FixedClock, SequentialIdGenerator, State};
//! use ledger_testing::*;
//! use rust_decimal::Decimal;
//!
//! let ctx = Context::new(
//!     FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
//!     SequentialIdGenerator::default(),
//! );
//!
//! State::given_no_events()
//!     .when(&ctx, Command::OpenBankAccount { initial_amount: Decimal::new(100, 0) })
//!     .then_ok_len(2)
//!     .apply()
//!     .should_satisfy(|state| state.total_balance() == Decimal::new(100, 0));
//! ```

#![deny(missing_docs)]

use std::fmt;

use ledger::{Aggregate, Context};

/// An aggregate given events.
pub struct GivenTest<A>(A);

/// An aggregate when a command is performed.
pub struct WhenTest<A, R> {
    aggregate: A,
    result: R,
}

/// Given events for an aggregate.
pub trait Given: Aggregate + Sized {
    /// Given a single event for an aggregate.
    fn given(event: impl Into<<Self as Aggregate>::Event>) -> GivenTest<Self>
    where
        <Self as Aggregate>::Error: fmt::Debug,
    {
        Self::given_events(vec![event.into()])
    }

    /// Given events for an aggregate.
    ///
    /// # Panics
    ///
    /// Panics if any event is rejected while replaying.
    fn given_events(events: impl Into<Vec<<Self as Aggregate>::Event>>) -> GivenTest<Self>
    where
        <Self as Aggregate>::Error: fmt::Debug,
    {
        let events = events.into();
        let aggregate = Self::project(&events)
            .unwrap_or_else(|err| panic!("given events were rejected: {err:?}"));
        GivenTest(aggregate)
    }

    /// Given no events for an aggregate.
    fn given_no_events() -> GivenTest<Self> {
        GivenTest(Self::initial())
    }
}

impl<A> Given for A where A: Aggregate + Sized {}

impl<A> GivenTest<A>
where
    A: Aggregate,
{
    /// When a command is decided.
    pub fn when(
        self,
        ctx: &Context,
        command: <A as Aggregate>::Command,
    ) -> WhenTest<A, Result<Vec<<A as Aggregate>::Event>, <A as Aggregate>::Error>> {
        let result = self.0.decide(ctx, command);
        WhenTest {
            aggregate: self.0,
            result,
        }
    }

    /// When an arbitrary function runs against the aggregate.
    pub fn when_fn<F, R>(self, f: F) -> WhenTest<A, R>
    where
        F: FnOnce(&A) -> R,
    {
        let result = f(&self.0);
        WhenTest {
            aggregate: self.0,
            result,
        }
    }

    /// Given previous events, the aggregate should equal the given state.
    pub fn should_eq<S>(self, state: S) -> Self
    where
        A: fmt::Debug + PartialEq<S>,
        S: fmt::Debug,
    {
        assert_eq!(self.0, state);
        self
    }

    /// Given previous events, the aggregate should satisfy the predicate.
    pub fn should_satisfy<F>(self, f: F) -> Self
    where
        A: fmt::Debug,
        F: FnOnce(&A) -> bool,
    {
        assert!(f(&self.0), "aggregate did not satisfy predicate: {:?}", self.0);
        self
    }

    /// Given previous events, the aggregate's state should be unchanged.
    pub fn should_be_unchanged(self) -> Self
    where
        A: fmt::Debug + PartialEq<A>,
    {
        assert_eq!(self.0, A::initial());
        self
    }

    /// Get the inner aggregate.
    pub fn into_state(self) -> A {
        self.0
    }
}

impl<A, R> WhenTest<A, R>
where
    A: Aggregate,
{
    /// Get the inner result from the previous when() action.
    pub fn into_result(self) -> R {
        self.result
    }

    /// Get the inner aggregate.
    pub fn into_state(self) -> A {
        self.aggregate
    }

    /// Then the result of the previous when() action should equal the given parameter.
    pub fn then<T>(self, result: T) -> WhenTest<A, R>
    where
        R: fmt::Debug + PartialEq<T>,
        T: fmt::Debug,
    {
        assert_eq!(self.result, result);
        self
    }
}

impl<A, E> WhenTest<A, Result<Vec<<A as Aggregate>::Event>, E>>
where
    A: Aggregate,
    <A as Aggregate>::Event: fmt::Debug,
    E: fmt::Debug,
{
    /// Then the previous when() action should have succeeded with the given events.
    pub fn then_ok<T>(self, events: T) -> WhenTest<A, Vec<<A as Aggregate>::Event>>
    where
        Vec<<A as Aggregate>::Event>: PartialEq<T>,
        T: fmt::Debug,
    {
        let result = self.expect_ok();
        assert_eq!(result.result, events);
        result
    }

    /// Then the previous when() action should have succeeded with `len` events.
    pub fn then_ok_len(self, len: usize) -> WhenTest<A, Vec<<A as Aggregate>::Event>> {
        let result = self.expect_ok();
        assert_eq!(result.result.len(), len, "events: {:?}", result.result);
        result
    }

    /// Then the previous when() action should have failed with the given error.
    pub fn then_err<T>(self, err: T) -> GivenTest<A>
    where
        E: PartialEq<T>,
        T: fmt::Debug,
    {
        match self.result {
            Ok(events) => panic!("expected error {err:?}, got events {events:?}"),
            Err(actual) => assert_eq!(actual, err),
        }
        GivenTest(self.aggregate)
    }

    fn expect_ok(self) -> WhenTest<A, Vec<<A as Aggregate>::Event>> {
        match self.result {
            Ok(events) => WhenTest {
                aggregate: self.aggregate,
                result: events,
            },
            Err(err) => panic!("expected events, got error {err:?}"),
        }
    }
}

impl<A> WhenTest<A, Vec<<A as Aggregate>::Event>>
where
    A: Aggregate,
    <A as Aggregate>::Error: fmt::Debug,
{
    /// Apply the events of the previous when() action.
    ///
    /// # Panics
    ///
    /// Panics if the aggregate rejects one of the events.
    pub fn apply(self) -> GivenTest<A> {
        let aggregate = self
            .result
            .iter()
            .try_fold(self.aggregate, |aggregate, event| aggregate.evolve(event))
            .unwrap_or_else(|err| panic!("decided events were rejected: {err:?}"));
        GivenTest(aggregate)
    }

    /// Inspect the events of the previous when() action.
    pub fn then_events<F>(self, f: F) -> Self
    where
        F: FnOnce(&[<A as Aggregate>::Event]),
    {
        f(&self.result);
        self
    }
}
