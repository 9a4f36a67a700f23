use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{AccountId, Error, Result};

/// Everything that can be asked of a bank account.
///
/// The last two variants only read state. The decider refuses them, they
/// are answered by a query side instead.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum Command {
    /// Open a new account funded with an initial amount.
    OpenBankAccount {
        /// Amount deposited right after opening.
        initial_amount: Decimal,
    },
    /// Deposit cash into an account.
    DepositCash {
        /// Account to credit.
        account_id: AccountId,
        /// Amount to deposit.
        amount: Decimal,
    },
    /// Withdraw cash from an account.
    WithdrawCash {
        /// Account to debit.
        account_id: AccountId,
        /// Amount to withdraw.
        amount: Decimal,
    },
    /// Move cash between two accounts.
    TransferCash {
        /// Account to debit.
        from_account_id: AccountId,
        /// Account to credit.
        to_account_id: AccountId,
        /// Amount to move.
        amount: Decimal,
    },
    /// Sweep the remaining balance and close an account.
    CloseBankAccount {
        /// Account to close.
        account_id: AccountId,
    },
    /// Report an account's balance up to a date.
    CheckBalanceAccount {
        /// Account to report on.
        account_id: AccountId,
        /// Include the list of deposits.
        #[serde(default)]
        show_deposits: bool,
        /// Include the list of withdrawals.
        #[serde(default)]
        show_withdrawals: bool,
        /// Last day included in the report.
        show_until: NaiveDate,
    },
    /// List an account's events between two dates, inclusive.
    CheckAccountHistory {
        /// Account to report on.
        account_id: AccountId,
        /// First day included.
        from: NaiveDate,
        /// Last day included.
        to: NaiveDate,
    },
}

/// Names accepted by [`Command::decode`].
const COMMANDS: [&str; 7] = [
    "OpenBankAccount",
    "DepositCash",
    "WithdrawCash",
    "TransferCash",
    "CloseBankAccount",
    "CheckBalanceAccount",
    "CheckAccountHistory",
];

impl Command {
    /// Decodes a command from its name and JSON payload.
    ///
    /// Unknown command names fail with [`Error::UnsupportedCommand`].
    pub fn decode(command: &str, payload: Value) -> Result<Self> {
        if !COMMANDS.iter().any(|name| *name == command) {
            return Err(Error::unsupported_command(command));
        }

        let mut tagged = Map::new();
        tagged.insert(command.to_string(), payload);
        serde_json::from_value(Value::Object(tagged))
            .map_err(|err| Error::DeserializeCommand(err.to_string()))
    }

    /// Name of the command variant.
    pub fn kind(&self) -> &'static str {
        use Command::*;

        match self {
            OpenBankAccount { .. } => "OpenBankAccount",
            DepositCash { .. } => "DepositCash",
            WithdrawCash { .. } => "WithdrawCash",
            TransferCash { .. } => "TransferCash",
            CloseBankAccount { .. } => "CloseBankAccount",
            CheckBalanceAccount { .. } => "CheckBalanceAccount",
            CheckAccountHistory { .. } => "CheckAccountHistory",
        }
    }

    /// Accounts whose history must be loaded before deciding.
    pub fn account_ids(&self) -> Vec<AccountId> {
        use Command::*;

        match self {
            OpenBankAccount { .. } => vec![],
            DepositCash { account_id, .. }
            | WithdrawCash { account_id, .. }
            | CloseBankAccount { account_id }
            | CheckBalanceAccount { account_id, .. }
            | CheckAccountHistory { account_id, .. } => vec![*account_id],
            TransferCash {
                from_account_id,
                to_account_id,
                ..
            } => vec![*from_account_id, *to_account_id],
        }
    }

    /// Whether the command only reads state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Command::CheckBalanceAccount { .. } | Command::CheckAccountHistory { .. }
        )
    }
}
