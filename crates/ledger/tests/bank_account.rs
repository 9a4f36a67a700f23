use chrono::{DateTime, TimeZone, Utc};
use ledger::{
    decide, project, AccountClosed, AccountId, AccountOpened, CashDeposited, CashTransferred,
    CashWithdrawn, Command, Context, Error, Event, FixedClock, SequentialIdGenerator, State,
};
use ledger_testing::*;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
}

fn ctx() -> Context {
    Context::new(FixedClock(now()), SequentialIdGenerator::default())
}

fn id(n: u128) -> AccountId {
    AccountId::from_uuid(Uuid::from_u128(n))
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn opened_with(n: u128, amount: i64) -> Vec<Event> {
    vec![
        Event::new(now(), AccountOpened { account_id: id(n) }),
        Event::new(
            now(),
            CashDeposited {
                account_id: id(n),
                amount: dec(amount),
            },
        ),
    ]
}

#[test]
fn open_account() {
    State::given_no_events()
        // Open account with 100
        .when(
            &ctx(),
            Command::OpenBankAccount {
                initial_amount: dec(100),
            },
        )
        // Then opened and funded, in that order
        .then_ok(opened_with(1, 100))
        .apply()
        .should_satisfy(|state| {
            let account = state.account(&id(1)).unwrap();
            account.balance == dec(100) && account.closed_at.is_none()
        });
}

#[test]
fn open_deposit_withdraw() {
    let ctx = ctx();
    let mut history = Vec::new();

    let mut state = State::empty();
    for command in [
        Command::OpenBankAccount {
            initial_amount: dec(100),
        },
        Command::DepositCash {
            account_id: id(1),
            amount: dec(50),
        },
        Command::WithdrawCash {
            account_id: id(1),
            amount: dec(30),
        },
    ] {
        let events = decide(&ctx, command, &state).unwrap();
        history.extend(events);
        state = project(&history).unwrap();
    }

    assert_eq!(history.len(), 4);
    assert_eq!(state.account(&id(1)).unwrap().balance, dec(120));
}

#[test]
fn deposit_funds() {
    State::given_no_events()
        // Deposit before opening
        .when(
            &ctx(),
            Command::DepositCash {
                account_id: id(1),
                amount: dec(10),
            },
        )
        .then_err(Error::AccountNotFound(id(1)));

    State::given_events(opened_with(1, 0))
        .when(
            &ctx(),
            Command::DepositCash {
                account_id: id(1),
                amount: dec(10),
            },
        )
        .then_ok(vec![Event::new(
            now(),
            CashDeposited {
                account_id: id(1),
                amount: dec(10),
            },
        )])
        .apply()
        // Deposit -50
        .when(
            &ctx(),
            Command::DepositCash {
                account_id: id(1),
                amount: dec(-50),
            },
        )
        .then_err(Error::InvalidAmount(dec(-50)))
        .should_satisfy(|state| state.total_balance() == dec(10));
}

#[test]
fn withdraw_funds() {
    State::given_events(opened_with(1, 0))
        // Withdraw before depositing
        .when(
            &ctx(),
            Command::WithdrawCash {
                account_id: id(1),
                amount: dec(10),
            },
        )
        .then_err(Error::InsufficientFunds {
            account_id: id(1),
            balance: dec(0),
            requested: dec(10),
        })
        // Deposit 50
        .when(
            &ctx(),
            Command::DepositCash {
                account_id: id(1),
                amount: dec(50),
            },
        )
        .then_ok_len(1)
        .apply()
        // Withdraw 45
        .when(
            &ctx(),
            Command::WithdrawCash {
                account_id: id(1),
                amount: dec(45),
            },
        )
        .then_ok(vec![Event::new(
            now(),
            CashWithdrawn {
                account_id: id(1),
                amount: dec(45),
            },
        )])
        .apply()
        // Withdraw 6
        .when(
            &ctx(),
            Command::WithdrawCash {
                account_id: id(1),
                amount: dec(6),
            },
        )
        .then_err(Error::InsufficientFunds {
            account_id: id(1),
            balance: dec(5),
            requested: dec(6),
        });
}

#[test]
fn transfer_conserves_total_balance() {
    let mut given = opened_with(1, 80);
    given.extend(opened_with(2, 20));

    let state = State::given_events(given)
        .when(
            &ctx(),
            Command::TransferCash {
                from_account_id: id(1),
                to_account_id: id(2),
                amount: dec(30),
            },
        )
        .then_ok(vec![
            Event::new(
                now(),
                CashWithdrawn {
                    account_id: id(1),
                    amount: dec(30),
                },
            ),
            Event::new(
                now(),
                CashDeposited {
                    account_id: id(2),
                    amount: dec(30),
                },
            ),
            Event::new(
                now(),
                CashTransferred {
                    from_account_id: id(1),
                    to_account_id: id(2),
                    amount: dec(30),
                },
            ),
        ])
        .apply()
        .into_state();

    assert_eq!(state.account(&id(1)).unwrap().balance, dec(50));
    assert_eq!(state.account(&id(2)).unwrap().balance, dec(50));
    assert_eq!(state.total_balance(), dec(100));
}

#[test]
fn transfer_requires_both_accounts() {
    State::given_events(opened_with(1, 80))
        .when(
            &ctx(),
            Command::TransferCash {
                from_account_id: id(1),
                to_account_id: id(2),
                amount: dec(30),
            },
        )
        .then_err(Error::AccountNotFound(id(2)));
}

#[test]
fn close_account() {
    State::given_events(opened_with(1, 75))
        .when(&ctx(), Command::CloseBankAccount { account_id: id(1) })
        .then_ok(vec![
            Event::new(
                now(),
                CashWithdrawn {
                    account_id: id(1),
                    amount: dec(75),
                },
            ),
            Event::new(now(), AccountClosed { account_id: id(1) }),
        ])
        .apply()
        .should_satisfy(|state| {
            let account = state.account(&id(1)).unwrap();
            account.balance.is_zero() && account.closed_at == Some(now())
        })
        // Closed accounts are terminal
        .when(
            &ctx(),
            Command::DepositCash {
                account_id: id(1),
                amount: dec(1),
            },
        )
        .then_err(Error::AccountClosed(id(1)))
        .when(&ctx(), Command::CloseBankAccount { account_id: id(1) })
        .then_err(Error::AccountClosed(id(1)));
}

#[test]
fn close_missing_account() {
    State::given_events(opened_with(1, 75))
        .when(&ctx(), Command::CloseBankAccount { account_id: id(9) })
        .then_err(Error::AccountNotFound(id(9)))
        .should_satisfy(|state| state.len() == 1);
}

#[test]
fn untyped_commands_and_events() {
    let err = Command::decode("PayFee", json!({ "account_id": id(1), "amount": "2" })).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedCommand {
            command: "PayFee".to_string()
        }
    );

    let err = Event::decode("FeeCharged", now(), json!({ "account_id": id(1) })).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedEvent {
            event: "FeeCharged".to_string()
        }
    );
}

#[test]
fn query_commands_are_unsupported() {
    State::given_events(opened_with(1, 75))
        .when(
            &ctx(),
            Command::CheckBalanceAccount {
                account_id: id(1),
                show_deposits: true,
                show_withdrawals: true,
                show_until: now().date_naive(),
            },
        )
        .then_err(Error::UnsupportedCommand {
            command: "CheckBalanceAccount".to_string(),
        });
}
