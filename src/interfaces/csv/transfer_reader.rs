use crate::domain::transfer::TransferRequest;
use crate::error::{BankError, Result};
use std::io::Read;

/// Reads transfer requests from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<TransferRequest>`. It handles whitespace trimming and flexible
/// record lengths automatically.
pub struct TransferReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransferReader<R> {
    /// Creates a new `TransferReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes transfer requests.
    pub fn transfers(self) -> impl Iterator<Item = Result<TransferRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BankError::from))
    }
}
