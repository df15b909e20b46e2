use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes accounts as CSV (`id,holder_name,balance,status`).
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts<'a>(
        &mut self,
        accounts: impl IntoIterator<Item = &'a Account>,
    ) -> Result<()> {
        self.writer
            .write_record(["id", "holder_name", "balance", "status"])?;
        for account in accounts {
            self.writer.write_record([
                account.id.to_string(),
                account.holder_name.clone(),
                account.balance.to_string(),
                account.status.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
