use crate::domain::account::AccountId;
use crate::domain::ledger::LedgerId;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BankError>;

#[derive(Error, Debug)]
pub enum BankError {
    #[error(
        "insufficient funds in account {account}: requested {requested}, available {available}"
    )]
    InsufficientFunds {
        account: AccountId,
        requested: Decimal,
        available: Decimal,
    },
    #[error("account {0} not found")]
    AccountNotFound(AccountId),
    #[error("ledger {0} not found")]
    LedgerNotFound(LedgerId),
    #[error("transfer amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("storage error: {0}")]
    Storage(String),
}
