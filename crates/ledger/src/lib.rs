//! Event sourced bank accounts.
//!
//! Commands are decided against the current [`State`] into a list of
//! [`Event`]s, and the state is rebuilt by folding events one at a time.
//!
//! ```
//! use ledger::{decide, project, Command, Context, State};
//! use rust_decimal::Decimal;
//!
//! let ctx = Context::system();
//! let events = decide(
//!     &ctx,
//!     Command::OpenBankAccount {
//!         initial_amount: Decimal::new(100, 0),
//!     },
//!     &State::empty(),
//! )
//! .unwrap();
//!
//! let state = project(&events).unwrap();
//! assert_eq!(state.total_balance(), Decimal::new(100, 0));
//! ```

#![deny(missing_docs)]

pub use account::*;
pub use aggregate::*;
pub use command::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use state::*;

mod account;
mod aggregate;
mod command;
mod context;
mod decider;
mod error;
mod event;
mod evolver;
mod state;

/// Decides what happened when `command` is executed against `state`.
///
/// Returns the events in the order they must be applied.
pub fn decide(ctx: &Context, command: Command, state: &State) -> Result<Vec<Event>> {
    decider::decide(ctx, command, state)
}

/// Applies a single event to `state`, returning the next state.
pub fn evolve(event: &Event, state: &State) -> Result<State> {
    evolver::evolve(event, state)
}

/// Rebuilds state by replaying `events` from [`State::empty`].
pub fn project<'a, I>(events: I) -> Result<State>
where
    I: IntoIterator<Item = &'a Event>,
{
    <State as Aggregate>::project(events)
}
