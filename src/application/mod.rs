//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `TransferService` which acts as the primary entry
//! point for transfers and account/ledger directory operations. All state
//! goes through the persistence ports; transfers run inside an explicit
//! unit of work.

pub mod service;
