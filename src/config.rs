//! Backend selection.
//!
//! Every option can come from the command line or from the environment.

use crate::domain::ledger::Ledger;
use crate::domain::ports::TransferExecutorBox;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryLedgerStore;
use crate::infrastructure::mock::MockBackend;
use crate::infrastructure::remote::RemoteTransferClient;
use crate::interfaces::csv::account_reader::AccountReader;
use clap::Args;
use reqwest::Url;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Args, Debug, Clone, Default)]
pub struct BackendConfig {
    /// Base URL of the real server. When absent, the in-memory mock backend is used.
    #[arg(long, env = "MONEY_TRANSFER_BASE_URL", global = true)]
    pub base_url: Option<Url>,

    /// CSV file of seed accounts for the mock backend (id, holder_name, balance, status).
    #[arg(long, env = "MONEY_TRANSFER_SEED", global = true)]
    pub seed: Option<PathBuf>,

    /// Artificial delay added to every mock backend call, in milliseconds.
    #[arg(long, env = "MONEY_TRANSFER_LATENCY_MS", default_value_t = 0, global = true)]
    pub latency_ms: u64,
}

impl BackendConfig {
    /// Builds the executor this configuration selects.
    pub fn build(&self) -> Result<TransferExecutorBox> {
        if let Some(base_url) = &self.base_url {
            if self.seed.is_some() || self.latency_ms > 0 {
                warn!("--seed and --latency-ms only apply to the mock backend; ignoring them");
            }
            info!(%base_url, "using remote backend");
            return Ok(Box::new(RemoteTransferClient::new(base_url.clone())));
        }

        Ok(Box::new(self.mock_backend()?))
    }

    pub fn mock_backend(&self) -> Result<MockBackend> {
        let ledger = match &self.seed {
            Some(path) => load_ledger(path)?,
            None => Ledger::seeded(),
        };
        info!(accounts = ledger.accounts().len(), "using mock backend");
        Ok(MockBackend::new(InMemoryLedgerStore::from_ledger(ledger))
            .with_latency(Duration::from_millis(self.latency_ms)))
    }
}

/// Loads seed accounts from a CSV file. Any malformed row fails the whole load.
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    let file = File::open(path)?;
    let accounts = AccountReader::new(file)
        .accounts()
        .collect::<Result<Vec<_>>>()?;
    Ok(Ledger::with_accounts(accounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::domain::ports::TransferExecutor;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[tokio::test]
    async fn test_default_is_seeded_mock() {
        let executor = BackendConfig::default().build().unwrap();
        let account = executor.account(2).await.unwrap();
        assert_eq!(account.holder_name, "Jane Smith");
    }

    #[tokio::test]
    async fn test_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id, holder_name, balance, status").unwrap();
        writeln!(file, "10, Alice, 10.5, ACTIVE").unwrap();
        writeln!(file, "11, Bob, 0, LOCKED").unwrap();

        let config = BackendConfig {
            seed: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let backend = config.mock_backend().unwrap();

        assert_eq!(backend.balance(10).await.unwrap(), Balance::new(dec!(10.5)));
        assert!(backend.account(1).await.is_err());
    }

    #[test]
    fn test_missing_seed_file() {
        let config = BackendConfig {
            seed: Some(PathBuf::from("does/not/exist.csv")),
            ..Default::default()
        };
        assert!(config.build().is_err());
    }

    #[test]
    fn test_base_url_selects_remote() {
        let config = BackendConfig {
            base_url: Some(Url::parse("http://localhost:8080/").unwrap()),
            ..Default::default()
        };
        assert!(config.build().is_ok());
    }
}
