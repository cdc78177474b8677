use crate::domain::account::{Account, AccountId, Amount, Balance};
use crate::domain::ledger::{Ledger, LedgerId};
use crate::domain::ports::{AccountStoreBox, LedgerStoreBox, TransactionalBox, UnitOfWork};
use crate::domain::transfer::TransferRequest;
use crate::error::{BankError, Result};

/// The main entry point for moving funds between accounts.
///
/// `TransferService` orchestrates a transfer as one unit of work against the
/// persistence ports: the origin is debited before any write is staged, and
/// the three mutated entities (origin, destination, ledger) are published
/// atomically on commit. Every error path rolls the unit of work back, so an
/// aborted transfer leaves the store exactly as it was.
pub struct TransferService {
    accounts: AccountStoreBox,
    ledgers: LedgerStoreBox,
    boundary: TransactionalBox,
}

impl TransferService {
    /// Creates a new `TransferService` instance.
    ///
    /// # Arguments
    ///
    /// * `accounts` - The store for accounts.
    /// * `ledgers` - The store for ledgers.
    /// * `boundary` - The source of transactional units of work. Must cover
    ///   the same underlying storage as the two stores.
    pub fn new(
        accounts: AccountStoreBox,
        ledgers: LedgerStoreBox,
        boundary: TransactionalBox,
    ) -> Self {
        Self {
            accounts,
            ledgers,
            boundary,
        }
    }

    /// Moves `request.amount` from the origin to the destination account and
    /// advances the ledger's transfer counter, all-or-nothing.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<()> {
        let amount = Amount::new(request.amount)?;

        tracing::debug!(
            origin = request.origin,
            destination = request.destination,
            ledger = request.ledger,
            "transfer started"
        );

        let mut uow = self.boundary.begin().await?;
        match Self::apply(uow.as_mut(), request, amount).await {
            Ok(()) => {
                uow.commit().await?;
                tracing::info!(
                    origin = request.origin,
                    destination = request.destination,
                    amount = %amount.value(),
                    ledger = request.ledger,
                    "transfer committed"
                );
                Ok(())
            }
            Err(err) => {
                uow.rollback().await?;
                Err(err)
            }
        }
    }

    /// The load/transform/stage sequence executed inside the unit of work.
    ///
    /// The debit check runs strictly before any save, so an insufficient
    /// balance aborts with nothing staged at all.
    async fn apply(
        uow: &mut dyn UnitOfWork,
        request: &TransferRequest,
        amount: Amount,
    ) -> Result<()> {
        let origin = uow
            .load_account(request.origin)
            .await?
            .ok_or(BankError::AccountNotFound(request.origin))?;
        let origin = origin.debit(amount)?;
        uow.save_account(origin).await?;

        let destination = uow
            .load_account(request.destination)
            .await?
            .ok_or(BankError::AccountNotFound(request.destination))?;
        uow.save_account(destination.credit(amount)).await?;

        let ledger = uow
            .load_ledger(request.ledger)
            .await?
            .ok_or(BankError::LedgerNotFound(request.ledger))?;
        uow.save_ledger(ledger.record_transfer()).await?;

        Ok(())
    }

    /// Returns the current balance of the account, or `AccountNotFound`.
    pub async fn balance_of(&self, id: AccountId) -> Result<Balance> {
        let account = self
            .accounts
            .load(id)
            .await?
            .ok_or(BankError::AccountNotFound(id))?;
        Ok(account.balance)
    }

    /// Returns the number of transfers routed through the ledger, or
    /// `LedgerNotFound`.
    pub async fn transfer_count_of(&self, id: LedgerId) -> Result<u64> {
        let ledger = self
            .ledgers
            .load(id)
            .await?
            .ok_or(BankError::LedgerNotFound(id))?;
        Ok(ledger.transfer_count)
    }

    pub async fn find_account(&self, id: AccountId) -> Result<Option<Account>> {
        self.accounts.load(id).await
    }

    pub async fn find_account_by_owner(&self, owner: &str) -> Result<Option<Account>> {
        self.accounts.find_by_owner(owner).await
    }

    pub async fn find_all_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.load_all().await
    }

    pub async fn save_account(&self, account: Account) -> Result<Account> {
        self.accounts.save(account).await
    }

    pub async fn delete_account(&self, id: AccountId) -> Result<()> {
        self.accounts.delete(id).await
    }

    pub async fn find_ledger(&self, id: LedgerId) -> Result<Option<Ledger>> {
        self.ledgers.load(id).await
    }

    pub async fn find_all_ledgers(&self) -> Result<Vec<Ledger>> {
        self.ledgers.load_all().await
    }

    pub async fn save_ledger(&self, ledger: Ledger) -> Result<Ledger> {
        self.ledgers.save(ledger).await
    }

    pub async fn delete_ledger(&self, id: LedgerId) -> Result<()> {
        self.ledgers.delete(id).await
    }
}
