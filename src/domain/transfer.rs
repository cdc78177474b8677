use crate::domain::account::AccountId;
use crate::domain::ledger::LedgerId;
use rust_decimal::Decimal;
use serde::Deserialize;

/// A request to move `amount` from `origin` to `destination`, attributed to
/// the counter of `ledger`.
///
/// The amount is carried raw; the service validates it before any account
/// is loaded.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct TransferRequest {
    pub origin: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
    pub ledger: LedgerId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transfer_request_deserialization() {
        let csv = "origin, destination, amount, ledger\n1, 2, 100.0, 1";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: TransferRequest = iter
            .next()
            .unwrap()
            .expect("Failed to deserialize transfer request");

        assert_eq!(result.origin, 1);
        assert_eq!(result.destination, 2);
        assert_eq!(result.amount, dec!(100.0));
        assert_eq!(result.ledger, 1);
    }
}
