use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn write_accounts_csv(path: &Path, rows: &[(&str, &str)]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["owner", "balance"])?;
    for (owner, balance) in rows {
        wtr.write_record([*owner, *balance])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_transfers_csv(path: &Path, rows: &[(&str, &str, &str, &str)]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["origin", "destination", "amount", "ledger"])?;
    for (origin, destination, amount, ledger) in rows {
        wtr.write_record([*origin, *destination, *amount, *ledger])?;
    }

    wtr.flush()?;
    Ok(())
}
