use serde::{Deserialize, Serialize};

/// Store-assigned ledger identifier.
pub type LedgerId = u64;

/// An aggregate record tracking how many transfers have been routed
/// through it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Ledger {
    pub id: Option<LedgerId>,
    pub label: String,
    pub transfer_count: u64,
}

impl Ledger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            transfer_count: 0,
        }
    }

    /// Returns the ledger with its transfer counter advanced by one.
    pub fn record_transfer(self) -> Self {
        Self {
            transfer_count: self.transfer_count + 1,
            ..self
        }
    }
}
