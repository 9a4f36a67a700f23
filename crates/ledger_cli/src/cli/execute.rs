use anyhow::{Context, Result};
use clap::Args;
use ledger::Command;

use super::report::print_result;
use super::{print_recorded, LedgerDispatcher};
use crate::terminal::Terminal;

/// Execute a command by name with a JSON payload
#[derive(Args, Clone, Debug)]
pub struct Execute {
    /// Command to execute, such as `DepositCash`
    command: String,
    /// Command data in JSON
    payload: String,
}

impl Execute {
    pub async fn run(self, dispatcher: &LedgerDispatcher, terminal: &Terminal) -> Result<()> {
        let payload = serde_json::from_str(&self.payload).context("payload is not valid json")?;
        let command = Command::decode(&self.command, payload)?;

        if command.is_query() {
            let result = dispatcher.query(command).await?;
            return print_result(terminal, result);
        }

        let records = dispatcher.execute(command).await?;
        terminal.status(
            "Executed",
            format!("{} with {} events", self.command, records.len()),
        )?;
        print_recorded(terminal, &records)
    }
}
