mod account;
mod execute;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_store::{Dispatcher, FlatFileEventStore, RecordedEvent};
use owo_colors::AnsiColors;
use tracing::debug;

use self::account::{Close, Deposit, Open, Transfer, Withdraw};
use self::execute::Execute;
use self::report::{Balance, Events, History};
use crate::terminal::{Color, Terminal, Verbosity};

/// Event sourced bank accounts
#[derive(Parser, Debug)]
#[command(name = "ledger", version)]
pub struct Cli {
    /// File the event log is stored in
    #[arg(long, env = "LEDGER_STORE", default_value = "./ledger-events.jsonl")]
    store: PathBuf,
    /// Coloring: auto, always, never
    #[arg(long, default_value_t = Color::Auto)]
    color: Color,
    /// Do not print status lines
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Print the payload of recorded events
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    /// Open an account with an initial deposit
    Open(Open),
    /// Deposit cash into an account
    Deposit(Deposit),
    /// Withdraw cash from an account
    Withdraw(Withdraw),
    /// Transfer cash between two accounts
    Transfer(Transfer),
    /// Withdraw the remaining balance and close an account
    Close(Close),
    /// Show the balance of an account
    Balance(Balance),
    /// List the events of an account between two dates
    History(History),
    /// Execute a command by name with a JSON payload
    Execute(Execute),
    /// Dump the whole event log
    Events(Events),
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let terminal = Terminal::new(cli.verbosity(), cli.color);
    run_with(cli, &terminal).await
}

pub async fn run_with(cli: Cli, terminal: &Terminal) -> Result<()> {
    let store = FlatFileEventStore::load(&cli.store)
        .with_context(|| format!("failed to load event log {}", cli.store.display()))?;
    debug!(store = %cli.store.display(), "loaded event log");
    let dispatcher = Dispatcher::new(store, ledger::Context::system());

    match cli.command {
        Commands::Open(open) => open.run(&dispatcher, terminal).await,
        Commands::Deposit(deposit) => deposit.run(&dispatcher, terminal).await,
        Commands::Withdraw(withdraw) => withdraw.run(&dispatcher, terminal).await,
        Commands::Transfer(transfer) => transfer.run(&dispatcher, terminal).await,
        Commands::Close(close) => close.run(&dispatcher, terminal).await,
        Commands::Balance(balance) => balance.run(&dispatcher, terminal).await,
        Commands::History(history) => history.run(&dispatcher, terminal).await,
        Commands::Execute(execute) => execute.run(&dispatcher, terminal).await,
        Commands::Events(events) => events.run(&dispatcher, terminal).await,
    }
}

type LedgerDispatcher = Dispatcher<FlatFileEventStore>;

/// Prints one status line per recorded event.
fn print_recorded(terminal: &Terminal, records: &[RecordedEvent]) -> Result<()> {
    for record in records {
        terminal.status_with_color(
            "Recorded",
            format!("#{}  {}", record.position, record.event_type),
            AnsiColors::Cyan,
        )?;
        if terminal.verbosity() == Verbosity::Verbose {
            terminal.line(format!("    {}", record.data), None)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use tempfile::TempDir;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    async fn run_ledger(dir: &TempDir, args: &[&str]) -> Result<String> {
        let store = dir.path().join("events.jsonl");
        let store = store.to_string_lossy();
        let cli = Cli::try_parse_from(
            ["ledger", "--store", &*store]
                .into_iter()
                .chain(args.iter().copied()),
        )?;

        let out = Captured::default();
        let terminal = Terminal::from_write(Box::new(out.clone()), cli.verbosity());
        run_with(cli, &terminal).await?;

        let text = String::from_utf8(out.0.borrow().clone())?;
        Ok(text)
    }

    fn opened_id(output: &str) -> String {
        output
            .lines()
            .find_map(|line| line.trim().strip_prefix("Opened account "))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn open_deposit_and_check_balance() -> Result<()> {
        let dir = TempDir::new()?;

        let id = opened_id(&run_ledger(&dir, &["open", "100"]).await?);
        run_ledger(&dir, &["deposit", &id, "50"]).await?;
        run_ledger(&dir, &["withdraw", &id, "30"]).await?;

        let output = run_ledger(&dir, &["-q", "balance", &id, "--deposits"]).await?;
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], format!("{id}  120"));
        assert_eq!(lines.len(), 3);

        let events = run_ledger(&dir, &["-q", "events"]).await?;
        assert_eq!(events.lines().count(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn untyped_execute_reports_unknown_command() -> Result<()> {
        let dir = TempDir::new()?;

        let err = run_ledger(&dir, &["execute", "PayFee", r#"{"amount":"1"}"#])
            .await
            .unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "PayFee cannot be handled for bank account"
        );

        Ok(())
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ledger", "-q", "-v", "events"]).is_err());
    }
}
