use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Store-assigned account identifier.
pub type AccountId = u64;

/// Represents the monetary balance of an account.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific rules
/// and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// Represents a positive monetary amount for transfers.
///
/// Ensures that transfer amounts are always positive. Zero and negative
/// amounts are rejected at construction, before any account is touched.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = BankError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// A ledger entry holding a balance attributable to a person.
///
/// `id` is `None` until the account is first persisted; the store assigns
/// the identifier and returns the persisted entity.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: Option<AccountId>,
    pub owner: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Balance) -> Self {
        Self {
            id: None,
            owner: owner.into(),
            balance,
        }
    }

    /// Subtracts `amount` from the balance, returning the updated account.
    ///
    /// Fails with `InsufficientFunds` if the result would be negative; the
    /// error carries the account id, the requested amount and the available
    /// balance.
    pub fn debit(self, amount: Amount) -> Result<Self> {
        let new_balance = self.balance - amount.into();
        if new_balance < Balance::ZERO {
            return Err(BankError::InsufficientFunds {
                account: self.id.unwrap_or_default(),
                requested: amount.value(),
                available: self.balance.value(),
            });
        }
        Ok(Self {
            balance: new_balance,
            ..self
        })
    }

    /// Adds `amount` to the balance unconditionally.
    pub fn credit(self, amount: Amount) -> Self {
        Self {
            balance: self.balance + amount.into(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_arithmetic() {
        let b1 = Balance::new(dec!(10.0));
        let b2 = Balance::new(dec!(5.0));
        assert_eq!(b1 + b2, Balance::new(dec!(15.0)));
        assert_eq!(b1 - b2, Balance::new(dec!(5.0)));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(BankError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(BankError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_account_debit_success() {
        let account = Account {
            id: Some(1),
            owner: "alice".into(),
            balance: Balance::new(dec!(1000)),
        };

        let account = account.debit(dec!(100).try_into().unwrap()).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(900)));
    }

    #[test]
    fn test_account_debit_insufficient() {
        let account = Account {
            id: Some(1),
            owner: "alice".into(),
            balance: Balance::new(dec!(1000)),
        };

        let err = account
            .clone()
            .debit(dec!(1200).try_into().unwrap())
            .unwrap_err();
        match err {
            BankError::InsufficientFunds {
                account: id,
                requested,
                available,
            } => {
                assert_eq!(id, 1);
                assert_eq!(requested, dec!(1200));
                assert_eq!(available, dec!(1000));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(account.balance, Balance::new(dec!(1000)));
    }

    #[test]
    fn test_account_debit_to_zero() {
        let account = Account::new("alice", Balance::new(dec!(50)));
        let account = account.debit(dec!(50).try_into().unwrap()).unwrap();
        assert_eq!(account.balance, Balance::ZERO);
    }

    #[test]
    fn test_account_credit() {
        let account = Account::new("bob", Balance::new(dec!(2000)));
        let account = account.credit(dec!(100).try_into().unwrap());
        assert_eq!(account.balance, Balance::new(dec!(2100)));
    }
}
