pub mod account;
pub mod ledger;
pub mod ports;
pub mod transfer;
