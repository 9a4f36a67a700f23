use crate::{decider, evolver, Command, Context, Error, Event, State};

/// Consistency boundary responsible for deciding commands and evolving
/// through events.
///
/// Both operations are pure. `decide` never changes the aggregate, and
/// `evolve` returns the next aggregate instead of mutating the current one.
pub trait Aggregate: Sized {
    /// Commands handled by the aggregate.
    type Command;
    /// Events produced and applied by the aggregate.
    type Event;
    /// Error returned when a command or event is rejected.
    type Error;

    /// Aggregate before any event has been applied.
    fn initial() -> Self;

    /// Decides which events result from handling `command`.
    fn decide(&self, ctx: &Context, command: Self::Command)
        -> Result<Vec<Self::Event>, Self::Error>;

    /// Applies a single event, returning the next aggregate.
    fn evolve(&self, event: &Self::Event) -> Result<Self, Self::Error>;

    /// Replays `events` in order, starting from [`Aggregate::initial`].
    fn project<'a, I>(events: I) -> Result<Self, Self::Error>
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        events
            .into_iter()
            .try_fold(Self::initial(), |aggregate, event| aggregate.evolve(event))
    }
}

impl Aggregate for State {
    type Command = Command;
    type Event = Event;
    type Error = Error;

    fn initial() -> Self {
        State::empty()
    }

    fn decide(&self, ctx: &Context, command: Command) -> Result<Vec<Event>, Error> {
        decider::decide(ctx, command, self)
    }

    fn evolve(&self, event: &Event) -> Result<Self, Error> {
        evolver::evolve(event, self)
    }
}
