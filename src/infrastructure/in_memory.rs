use crate::domain::account::{Account, AccountId};
use crate::domain::ledger::{Ledger, LedgerId};
use crate::domain::ports::{AccountStore, LedgerStore, Transactional, UnitOfWork};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

#[derive(Default)]
struct BankState {
    accounts: HashMap<AccountId, Account>,
    ledgers: HashMap<LedgerId, Ledger>,
    next_account_id: AccountId,
    next_ledger_id: LedgerId,
}

impl BankState {
    fn account_id_for(&mut self, account: &mut Account) -> AccountId {
        match account.id {
            Some(id) => {
                self.next_account_id = self.next_account_id.max(id);
                id
            }
            None => {
                self.next_account_id += 1;
                account.id = Some(self.next_account_id);
                self.next_account_id
            }
        }
    }

    fn ledger_id_for(&mut self, ledger: &mut Ledger) -> LedgerId {
        match ledger.id {
            Some(id) => {
                self.next_ledger_id = self.next_ledger_id.max(id);
                id
            }
            None => {
                self.next_ledger_id += 1;
                ledger.id = Some(self.next_ledger_id);
                self.next_ledger_id
            }
        }
    }
}

/// A thread-safe in-memory store for accounts and ledgers.
///
/// Uses `Arc<RwLock<_>>` to allow shared concurrent access; `Clone` shares
/// the underlying state, so the same instance can back the account port,
/// the ledger port and the transactional boundary. Ideal for testing or
/// runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryBankStore {
    state: Arc<RwLock<BankState>>,
}

impl InMemoryBankStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryBankStore {
    async fn load(&self, id: AccountId) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn save(&self, mut account: Account) -> Result<Account> {
        let mut state = self.state.write().await;
        let id = state.account_id_for(&mut account);
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> Result<()> {
        let mut state = self.state.write().await;
        state.accounts.remove(&id);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Account>> {
        let state = self.state.read().await;
        let mut accounts: Vec<_> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .filter(|account| account.owner == owner)
            .min_by_key(|account| account.id)
            .cloned())
    }
}

#[async_trait]
impl LedgerStore for InMemoryBankStore {
    async fn load(&self, id: LedgerId) -> Result<Option<Ledger>> {
        let state = self.state.read().await;
        Ok(state.ledgers.get(&id).cloned())
    }

    async fn save(&self, mut ledger: Ledger) -> Result<Ledger> {
        let mut state = self.state.write().await;
        let id = state.ledger_id_for(&mut ledger);
        state.ledgers.insert(id, ledger.clone());
        Ok(ledger)
    }

    async fn delete(&self, id: LedgerId) -> Result<()> {
        let mut state = self.state.write().await;
        state.ledgers.remove(&id);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Ledger>> {
        let state = self.state.read().await;
        let mut ledgers: Vec<_> = state.ledgers.values().cloned().collect();
        ledgers.sort_by_key(|ledger| ledger.id);
        Ok(ledgers)
    }
}

#[async_trait]
impl Transactional for InMemoryBankStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let state = Arc::clone(&self.state).write_owned().await;
        Ok(Box::new(InMemoryUnitOfWork {
            state,
            staged_accounts: HashMap::new(),
            staged_ledgers: HashMap::new(),
        }))
    }
}

/// A unit of work holding the store's write guard for its whole lifetime.
///
/// Writes land in the staging maps and are applied to the shared state only
/// on commit; concurrent units of work serialize on `begin`, and readers
/// block until the guard is released, so a half-applied transfer is never
/// observable.
pub struct InMemoryUnitOfWork {
    state: OwnedRwLockWriteGuard<BankState>,
    staged_accounts: HashMap<AccountId, Account>,
    staged_ledgers: HashMap<LedgerId, Ledger>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn load_account(&mut self, id: AccountId) -> Result<Option<Account>> {
        if let Some(account) = self.staged_accounts.get(&id) {
            return Ok(Some(account.clone()));
        }
        Ok(self.state.accounts.get(&id).cloned())
    }

    async fn save_account(&mut self, mut account: Account) -> Result<Account> {
        let id = self.state.account_id_for(&mut account);
        self.staged_accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn load_ledger(&mut self, id: LedgerId) -> Result<Option<Ledger>> {
        if let Some(ledger) = self.staged_ledgers.get(&id) {
            return Ok(Some(ledger.clone()));
        }
        Ok(self.state.ledgers.get(&id).cloned())
    }

    async fn save_ledger(&mut self, mut ledger: Ledger) -> Result<Ledger> {
        let id = self.state.ledger_id_for(&mut ledger);
        self.staged_ledgers.insert(id, ledger.clone());
        Ok(ledger)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let Self {
            mut state,
            staged_accounts,
            staged_ledgers,
        } = *self;
        state.accounts.extend(staged_accounts);
        state.ledgers.extend(staged_ledgers);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryBankStore::new();

        let first = AccountStore::save(&store, Account::new("alice", Balance::new(dec!(100.0))))
            .await
            .unwrap();
        let second = AccountStore::save(&store, Account::new("bob", Balance::new(dec!(200.0))))
            .await
            .unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn test_save_with_explicit_id_advances_counter() {
        let store = InMemoryBankStore::new();

        let mut seeded = Account::new("alice", Balance::new(dec!(100.0)));
        seeded.id = Some(7);
        AccountStore::save(&store, seeded).await.unwrap();

        let next = AccountStore::save(&store, Account::new("bob", Balance::new(dec!(200.0))))
            .await
            .unwrap();
        assert_eq!(next.id, Some(8));
    }

    #[tokio::test]
    async fn test_load_and_delete() {
        let store = InMemoryBankStore::new();
        let account = AccountStore::save(&store, Account::new("alice", Balance::new(dec!(100.0))))
            .await
            .unwrap();
        let id = account.id.unwrap();

        let retrieved = AccountStore::load(&store, id).await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        AccountStore::delete(&store, id).await.unwrap();
        assert!(AccountStore::load(&store, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_all_ordered_by_id() {
        let store = InMemoryBankStore::new();
        for owner in ["alice", "bob", "carol"] {
            AccountStore::save(&store, Account::new(owner, Balance::ZERO))
                .await
                .unwrap();
        }

        let all = AccountStore::load_all(&store).await.unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_find_by_owner_first_match_in_id_order() {
        let store = InMemoryBankStore::new();
        AccountStore::save(&store, Account::new("alice", Balance::new(dec!(1.0))))
            .await
            .unwrap();
        AccountStore::save(&store, Account::new("alice", Balance::new(dec!(2.0))))
            .await
            .unwrap();

        let found = store.find_by_owner("alice").await.unwrap().unwrap();
        assert_eq!(found.id, Some(1));

        assert!(store.find_by_owner("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unit_of_work_commit_publishes_writes() {
        let store = InMemoryBankStore::new();
        let account = AccountStore::save(&store, Account::new("alice", Balance::new(dec!(100.0))))
            .await
            .unwrap();
        let id = account.id.unwrap();

        let mut uow = store.begin().await.unwrap();
        let staged = uow.load_account(id).await.unwrap().unwrap();
        uow.save_account(staged.credit(dec!(50.0).try_into().unwrap()))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let reloaded = AccountStore::load(&store, id).await.unwrap().unwrap();
        assert_eq!(reloaded.balance, Balance::new(dec!(150.0)));
    }

    #[tokio::test]
    async fn test_unit_of_work_rollback_discards_writes() {
        let store = InMemoryBankStore::new();
        let account = AccountStore::save(&store, Account::new("alice", Balance::new(dec!(100.0))))
            .await
            .unwrap();
        let id = account.id.unwrap();

        let mut uow = store.begin().await.unwrap();
        let staged = uow.load_account(id).await.unwrap().unwrap();
        uow.save_account(staged.credit(dec!(50.0).try_into().unwrap()))
            .await
            .unwrap();
        uow.rollback().await.unwrap();

        let reloaded = AccountStore::load(&store, id).await.unwrap().unwrap();
        assert_eq!(reloaded.balance, Balance::new(dec!(100.0)));
    }

    #[tokio::test]
    async fn test_unit_of_work_reads_its_own_writes() {
        let store = InMemoryBankStore::new();
        let ledger = LedgerStore::save(&store, Ledger::new("main")).await.unwrap();
        let id = ledger.id.unwrap();

        let mut uow = store.begin().await.unwrap();
        let staged = uow.load_ledger(id).await.unwrap().unwrap();
        uow.save_ledger(staged.record_transfer()).await.unwrap();

        let observed = uow.load_ledger(id).await.unwrap().unwrap();
        assert_eq!(observed.transfer_count, 1);

        uow.rollback().await.unwrap();
        let reloaded = LedgerStore::load(&store, id).await.unwrap().unwrap();
        assert_eq!(reloaded.transfer_count, 0);
    }
}
