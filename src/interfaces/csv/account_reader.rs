use crate::domain::account::{Account, Balance};
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct AccountRecord {
    owner: String,
    balance: Decimal,
}

/// Reads account seed rows (`owner, balance`) from a CSV source.
///
/// Produced accounts carry no id; the store assigns one on save.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        self.reader.into_deserialize().map(|result| {
            result
                .map(|record: AccountRecord| {
                    Account::new(record.owner, Balance::new(record.balance))
                })
                .map_err(BankError::from)
        })
    }
}
