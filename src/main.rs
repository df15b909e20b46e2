use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use money_transfer::config::BackendConfig;
use money_transfer::domain::account::AccountId;
use money_transfer::domain::ports::TransferExecutor;
use money_transfer::domain::transfer::{BalanceResponse, LoginRequest, TransferRequest};
use money_transfer::error::{ErrorResponse, TransferError};
use money_transfer::interfaces::csv::account_writer::AccountWriter;
use money_transfer::interfaces::csv::transfer_reader::TransferReader;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    backend: BackendConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move money between two accounts
    Transfer {
        #[arg(long)]
        from: AccountId,
        #[arg(long)]
        to: AccountId,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        /// Idempotency key identifying this logical transfer
        #[arg(long)]
        key: Option<String>,
    },
    /// Show an account
    Account { id: AccountId },
    /// Show the balance of an account
    Balance { id: AccountId },
    /// Show the transactions of an account, most recent first
    History { id: AccountId },
    /// Log in and print the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Submit every transfer of a CSV file (from, to, amount, idempotency_key)
    Batch {
        input: PathBuf,
        /// Print the final state of every account touched by the batch, as CSV
        #[arg(long)]
        summary: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let executor = cli.backend.build().into_diagnostic()?;

    match cli.command {
        Command::Transfer {
            from,
            to,
            amount,
            key,
        } => {
            let request = TransferRequest {
                from_account_id: from,
                to_account_id: to,
                amount,
                idempotency_key: key,
            };
            emit(executor.transfer(request).await)
        }
        Command::Account { id } => emit(executor.account(id).await),
        Command::Balance { id } => emit(
            executor
                .balance(id)
                .await
                .map(|balance| BalanceResponse { balance }),
        ),
        Command::History { id } => emit(executor.transactions(id).await),
        Command::Login { username, password } => {
            emit(executor.login(LoginRequest { username, password }).await)
        }
        Command::Batch { input, summary } => batch(&*executor, input, summary).await,
    }
}

async fn batch(executor: &dyn TransferExecutor, input: PathBuf, summary: bool) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let mut touched = BTreeSet::new();

    for (row, request) in TransferReader::new(file).requests().enumerate() {
        match request {
            Ok(request) => {
                touched.insert(request.from_account_id);
                touched.insert(request.to_account_id);
                emit(executor.transfer(request).await)?;
            }
            Err(e) => warn!(row = row + 1, "skipping unreadable transfer: {e}"),
        }
    }

    if summary {
        let mut accounts = Vec::new();
        for id in touched {
            match executor.account(id).await {
                Ok(account) => accounts.push(account),
                Err(TransferError::Internal(e)) => return Err(miette::miette!("{e}")),
                Err(_) => {}
            }
        }
        let stdout = io::stdout();
        AccountWriter::new(stdout.lock())
            .write_accounts(&accounts)
            .into_diagnostic()?;
    }

    Ok(())
}

/// Prints one JSON line: the value, or the error body for a refused request.
/// Only internal failures abort the program.
fn emit<T: Serialize>(result: money_transfer::error::Result<T>) -> Result<()> {
    let line = match result {
        Ok(value) => serde_json::to_string(&value),
        Err(e @ TransferError::Internal(_)) => return Err(e).into_diagnostic(),
        Err(e) => serde_json::to_string(&ErrorResponse::from(&e)),
    }
    .into_diagnostic()?;
    println!("{line}");
    Ok(())
}
