use crate::domain::account::{Account, AccountId};
use crate::domain::ledger::{Ledger, LedgerId};
use crate::domain::ports::{AccountStore, LedgerStore, Transactional, UnitOfWork};
use crate::error::{BankError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing ledger states.
pub const CF_LEDGERS: &str = "ledgers";
/// Column Family for id counters.
pub const CF_META: &str = "meta";

const META_NEXT_ACCOUNT_ID: &str = "next_account_id";
const META_NEXT_LEDGER_ID: &str = "next_ledger_id";

/// A persistent store implementation using RocksDB.
///
/// Accounts and ledgers live in separate Column Families with big-endian
/// u64 keys, so iteration order is id order. Values are JSON. The store is
/// thread-safe (`Clone` shares the underlying `Arc<DB>`); units of work
/// serialize on a process-wide write mutex and publish their staged writes
/// through a single atomic `WriteBatch`.
#[derive(Clone)]
pub struct RocksDbBankStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbBankStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_ledgers = ColumnFamilyDescriptor::new(CF_LEDGERS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_ledgers, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BankError::Storage(format!("{name} column family not found")))
    }

    fn get_entity<T: DeserializeOwned>(&self, cf_name: &str, id: u64) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_entity<T: Serialize>(&self, cf_name: &str, id: u64, entity: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        self.db
            .put_cf(&cf, id.to_be_bytes(), serde_json::to_vec(entity)?)?;
        Ok(())
    }

    fn all_entities<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut entities = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            entities.push(serde_json::from_slice(&value)?);
        }
        Ok(entities)
    }

    fn read_counter(&self, key: &str) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| BankError::Storage(format!("corrupt {key} counter")))?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    fn write_counter(&self, key: &str, value: u64) -> Result<()> {
        let cf = self.cf(CF_META)?;
        self.db.put_cf(&cf, key, value.to_be_bytes())?;
        Ok(())
    }

    /// Allocates the next id for `key`, or advances the counter past an
    /// explicitly supplied id. Callers must hold the write lock.
    fn assign_id(&self, key: &str, explicit: Option<u64>) -> Result<u64> {
        let current = self.read_counter(key)?;
        match explicit {
            Some(id) => {
                if id > current {
                    self.write_counter(key, id)?;
                }
                Ok(id)
            }
            None => {
                let next = current + 1;
                self.write_counter(key, next)?;
                Ok(next)
            }
        }
    }
}

#[async_trait]
impl AccountStore for RocksDbBankStore {
    async fn load(&self, id: AccountId) -> Result<Option<Account>> {
        self.get_entity(CF_ACCOUNTS, id)
    }

    async fn save(&self, mut account: Account) -> Result<Account> {
        let _guard = self.write_lock.lock().await;
        let id = self.assign_id(META_NEXT_ACCOUNT_ID, account.id)?;
        account.id = Some(id);
        self.put_entity(CF_ACCOUNTS, id, &account)?;
        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.cf(CF_ACCOUNTS)?;
        self.db.delete_cf(&cf, id.to_be_bytes())?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Account>> {
        // Big-endian keys make iteration order id order.
        self.all_entities(CF_ACCOUNTS)
    }

    async fn find_by_owner(&self, owner: &str) -> Result<Option<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let account: Account = serde_json::from_slice(&value)?;
            if account.owner == owner {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl LedgerStore for RocksDbBankStore {
    async fn load(&self, id: LedgerId) -> Result<Option<Ledger>> {
        self.get_entity(CF_LEDGERS, id)
    }

    async fn save(&self, mut ledger: Ledger) -> Result<Ledger> {
        let _guard = self.write_lock.lock().await;
        let id = self.assign_id(META_NEXT_LEDGER_ID, ledger.id)?;
        ledger.id = Some(id);
        self.put_entity(CF_LEDGERS, id, &ledger)?;
        Ok(ledger)
    }

    async fn delete(&self, id: LedgerId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.cf(CF_LEDGERS)?;
        self.db.delete_cf(&cf, id.to_be_bytes())?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Ledger>> {
        self.all_entities(CF_LEDGERS)
    }
}

#[async_trait]
impl Transactional for RocksDbBankStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        Ok(Box::new(RocksDbUnitOfWork {
            store: self.clone(),
            _guard: guard,
            staged_accounts: HashMap::new(),
            staged_ledgers: HashMap::new(),
        }))
    }
}

/// A unit of work holding the store's write mutex for its whole lifetime.
///
/// Staged writes are flushed through one `WriteBatch` on commit, so either
/// all of them reach the database or none do.
pub struct RocksDbUnitOfWork {
    store: RocksDbBankStore,
    _guard: OwnedMutexGuard<()>,
    staged_accounts: HashMap<AccountId, Account>,
    staged_ledgers: HashMap<LedgerId, Ledger>,
}

#[async_trait]
impl UnitOfWork for RocksDbUnitOfWork {
    async fn load_account(&mut self, id: AccountId) -> Result<Option<Account>> {
        if let Some(account) = self.staged_accounts.get(&id) {
            return Ok(Some(account.clone()));
        }
        self.store.get_entity(CF_ACCOUNTS, id)
    }

    async fn save_account(&mut self, mut account: Account) -> Result<Account> {
        let id = self.store.assign_id(META_NEXT_ACCOUNT_ID, account.id)?;
        account.id = Some(id);
        self.staged_accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn load_ledger(&mut self, id: LedgerId) -> Result<Option<Ledger>> {
        if let Some(ledger) = self.staged_ledgers.get(&id) {
            return Ok(Some(ledger.clone()));
        }
        self.store.get_entity(CF_LEDGERS, id)
    }

    async fn save_ledger(&mut self, mut ledger: Ledger) -> Result<Ledger> {
        let id = self.store.assign_id(META_NEXT_LEDGER_ID, ledger.id)?;
        ledger.id = Some(id);
        self.staged_ledgers.insert(id, ledger.clone());
        Ok(ledger)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut batch = WriteBatch::default();
        {
            let cf = self.store.cf(CF_ACCOUNTS)?;
            for (id, account) in &self.staged_accounts {
                batch.put_cf(&cf, id.to_be_bytes(), serde_json::to_vec(account)?);
            }
        }
        {
            let cf = self.store.cf(CF_LEDGERS)?;
            for (id, ledger) in &self.staged_ledgers {
                batch.put_cf(&cf, id.to_be_bytes(), serde_json::to_vec(ledger)?);
            }
        }
        self.store.db.write(batch)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
