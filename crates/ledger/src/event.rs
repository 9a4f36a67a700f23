//! Events

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{AccountId, Error, Result};

/// A unique identifier for an event type.
pub trait EventType {
    /// Unique identifier for the active event variant.
    fn event_type(&self) -> &'static str;
}

/// A fact that happened to one or more bank accounts.
///
/// Events are immutable and the timestamp is captured when the event is
/// constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event data.
    pub payload: EventPayload,
}

impl Event {
    /// Creates an event that occurred at the given time.
    pub fn new(occurred_at: DateTime<Utc>, payload: impl Into<EventPayload>) -> Self {
        Event {
            occurred_at,
            payload: payload.into(),
        }
    }

    /// Decodes an event from its type name and JSON payload.
    ///
    /// Unknown event types fail with [`Error::UnsupportedEvent`].
    pub fn decode(event_type: &str, occurred_at: DateTime<Utc>, payload: Value) -> Result<Self> {
        EventPayload::decode(event_type, payload).map(|payload| Event::new(occurred_at, payload))
    }

    /// Accounts referenced by this event.
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.payload.account_ids()
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}

/// All bank account events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// An account was opened.
    AccountOpened(AccountOpened),
    /// Cash was deposited into an account.
    CashDeposited(CashDeposited),
    /// Cash was withdrawn from an account.
    CashWithdrawn(CashWithdrawn),
    /// Cash was transferred between two accounts.
    CashTransferred(CashTransferred),
    /// An account was closed.
    AccountClosed(AccountClosed),
}

impl EventPayload {
    /// Decodes a payload from its type name and JSON data.
    pub fn decode(event_type: &str, payload: Value) -> Result<Self> {
        fn from_value<T: DeserializeOwned>(payload: Value) -> Result<T> {
            serde_json::from_value(payload).map_err(|err| Error::DeserializeEvent(err.to_string()))
        }

        match event_type {
            "AccountOpened" => from_value(payload).map(EventPayload::AccountOpened),
            "CashDeposited" => from_value(payload).map(EventPayload::CashDeposited),
            "CashWithdrawn" => from_value(payload).map(EventPayload::CashWithdrawn),
            "CashTransferred" => from_value(payload).map(EventPayload::CashTransferred),
            "AccountClosed" => from_value(payload).map(EventPayload::AccountClosed),
            unknown => Err(Error::unsupported_event(unknown)),
        }
    }

    /// Serializes the inner event data, without the type name.
    pub fn data(&self) -> serde_json::Result<Value> {
        match self {
            EventPayload::AccountOpened(event) => serde_json::to_value(event),
            EventPayload::CashDeposited(event) => serde_json::to_value(event),
            EventPayload::CashWithdrawn(event) => serde_json::to_value(event),
            EventPayload::CashTransferred(event) => serde_json::to_value(event),
            EventPayload::AccountClosed(event) => serde_json::to_value(event),
        }
    }

    /// Accounts referenced by this event.
    pub fn account_ids(&self) -> Vec<AccountId> {
        match self {
            EventPayload::AccountOpened(AccountOpened { account_id })
            | EventPayload::CashDeposited(CashDeposited { account_id, .. })
            | EventPayload::CashWithdrawn(CashWithdrawn { account_id, .. })
            | EventPayload::AccountClosed(AccountClosed { account_id }) => vec![*account_id],
            EventPayload::CashTransferred(CashTransferred {
                from_account_id,
                to_account_id,
                ..
            }) => vec![*from_account_id, *to_account_id],
        }
    }
}

impl EventType for EventPayload {
    fn event_type(&self) -> &'static str {
        match self {
            EventPayload::AccountOpened(_) => "AccountOpened",
            EventPayload::CashDeposited(_) => "CashDeposited",
            EventPayload::CashWithdrawn(_) => "CashWithdrawn",
            EventPayload::CashTransferred(_) => "CashTransferred",
            EventPayload::AccountClosed(_) => "AccountClosed",
        }
    }
}

/// An account was opened with a zero balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    /// Id of the new account.
    pub account_id: AccountId,
}

/// Cash was deposited into an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashDeposited {
    /// Account credited.
    pub account_id: AccountId,
    /// Amount deposited.
    pub amount: Decimal,
}

/// Cash was withdrawn from an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashWithdrawn {
    /// Account debited.
    pub account_id: AccountId,
    /// Amount withdrawn.
    pub amount: Decimal,
}

/// Cash moved from one account to another.
///
/// The balance effects are carried by the accompanying [`CashWithdrawn`] and
/// [`CashDeposited`] events, this event only records the relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashTransferred {
    /// Account debited.
    pub from_account_id: AccountId,
    /// Account credited.
    pub to_account_id: AccountId,
    /// Amount transferred.
    pub amount: Decimal,
}

/// An account was closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClosed {
    /// Account closed.
    pub account_id: AccountId,
}

macro_rules! impl_into_payload {
    ($($event:ident),* $(,)?) => {
        $(
            impl From<$event> for EventPayload {
                fn from(event: $event) -> Self {
                    EventPayload::$event(event)
                }
            }
        )*
    };
}

impl_into_payload!(
    AccountOpened,
    CashDeposited,
    CashWithdrawn,
    CashTransferred,
    AccountClosed,
);

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn decode_known_event() {
        let id = AccountId::from_uuid(Uuid::from_u128(1));
        let payload = EventPayload::decode(
            "CashDeposited",
            json!({ "account_id": id, "amount": "12.50" }),
        )
        .unwrap();

        assert_eq!(
            payload,
            EventPayload::CashDeposited(CashDeposited {
                account_id: id,
                amount: Decimal::new(1250, 2),
            })
        );
        assert_eq!(payload.data().unwrap()["amount"], json!("12.50"));
    }

    #[test]
    fn decode_unknown_event() {
        let err = Event::decode("FeeCharged", Utc::now(), json!({})).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedEvent {
                event: "FeeCharged".to_string()
            }
        );
    }

    #[test]
    fn decode_malformed_event() {
        let err = EventPayload::decode("AccountClosed", json!({ "account": 1 })).unwrap_err();
        assert_eq!(err.code(), "DESERIALIZE_EVENT");
    }

    #[test]
    fn transfer_references_both_accounts() {
        let from = AccountId::from_uuid(Uuid::from_u128(1));
        let to = AccountId::from_uuid(Uuid::from_u128(2));
        let event = Event::new(
            Utc::now(),
            CashTransferred {
                from_account_id: from,
                to_account_id: to,
                amount: Decimal::ONE,
            },
        );

        assert_eq!(event.account_ids(), vec![from, to]);
        assert_eq!(event.event_type(), "CashTransferred");
    }
}
