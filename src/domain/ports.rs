use super::account::{Account, AccountId};
use super::ledger::{Ledger, LedgerId};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port for accounts.
///
/// `save` assigns an id when the entity has none and returns the persisted
/// entity. `load_all` returns accounts ordered by id.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn load(&self, id: AccountId) -> Result<Option<Account>>;
    async fn save(&self, account: Account) -> Result<Account>;
    async fn delete(&self, id: AccountId) -> Result<()>;
    async fn load_all(&self) -> Result<Vec<Account>>;
    async fn find_by_owner(&self, owner: &str) -> Result<Option<Account>>;
}

/// Persistence port for ledgers.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self, id: LedgerId) -> Result<Option<Ledger>>;
    async fn save(&self, ledger: Ledger) -> Result<Ledger>;
    async fn delete(&self, id: LedgerId) -> Result<()>;
    async fn load_all(&self) -> Result<Vec<Ledger>>;
}

/// A scoped, exclusive unit of work over accounts and ledgers.
///
/// Writes are staged and become visible to other callers only on `commit`;
/// loads observe the unit's own staged writes. Dropping a unit of work
/// without committing discards everything it staged.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn load_account(&mut self, id: AccountId) -> Result<Option<Account>>;
    async fn save_account(&mut self, account: Account) -> Result<Account>;
    async fn load_ledger(&mut self, id: LedgerId) -> Result<Option<Ledger>>;
    async fn save_ledger(&mut self, ledger: Ledger) -> Result<Ledger>;

    /// Atomically publishes every staged write.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discards every staged write.
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Source of transactional boundaries.
///
/// `begin` serializes against every other unit of work on the same store,
/// so read-modify-write sequences on one account never interleave.
#[async_trait]
pub trait Transactional: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type TransactionalBox = Box<dyn Transactional>;
