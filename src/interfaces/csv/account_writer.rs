use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes final account states (`id, owner, balance`) as CSV.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: Vec<Account>) -> Result<()> {
        for account in accounts {
            self.writer.serialize(account)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_output() {
        let mut account = Account::new("alice", Balance::new(dec!(900)));
        account.id = Some(1);

        let mut buffer = Vec::new();
        {
            let mut writer = AccountWriter::new(&mut buffer);
            writer.write_accounts(vec![account]).unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("id,owner,balance\n"));
        assert!(output.contains("1,alice,900"));
    }
}
