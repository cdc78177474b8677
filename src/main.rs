use clap::Parser;
use miette::{IntoDiagnostic, Result};
use minibank::application::service::TransferService;
use minibank::domain::ledger::Ledger;
use minibank::infrastructure::in_memory::InMemoryBankStore;
#[cfg(feature = "storage-rocksdb")]
use minibank::infrastructure::rocksdb::RocksDbBankStore;
use minibank::interfaces::csv::account_reader::AccountReader;
use minibank::interfaces::csv::account_writer::AccountWriter;
use minibank::interfaces::csv::transfer_reader::TransferReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed accounts CSV file (owner, balance)
    accounts: PathBuf,

    /// Transfer requests CSV file (origin, destination, amount, ledger)
    transfers: PathBuf,

    /// Label for the ledger created at startup
    #[arg(long, default_value = "main")]
    ledger_label: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn build_service(db_path: Option<PathBuf>) -> Result<TransferService> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        // Use persistent storage (RocksDB)
        let store = RocksDbBankStore::open(db_path).into_diagnostic()?;
        return Ok(TransferService::new(
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(store),
        ));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    // Use in-memory storage
    let store = InMemoryBankStore::new();
    Ok(TransferService::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let service = build_service(cli.db_path)?;

    // Seed accounts
    let file = File::open(cli.accounts).into_diagnostic()?;
    let reader = AccountReader::new(file);
    for account_result in reader.accounts() {
        match account_result {
            Ok(account) => {
                if let Err(e) = service.save_account(account).await {
                    eprintln!("Error seeding account: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading account: {}", e);
            }
        }
    }

    let ledger = service
        .save_ledger(Ledger::new(cli.ledger_label))
        .await
        .into_diagnostic()?;
    let ledger_id = ledger
        .id
        .ok_or_else(|| miette::miette!("ledger id was not assigned"))?;

    // Process transfers
    let file = File::open(cli.transfers).into_diagnostic()?;
    let reader = TransferReader::new(file);
    for request_result in reader.transfers() {
        match request_result {
            Ok(request) => {
                if let Err(e) = service.transfer(&request).await {
                    eprintln!("Error processing transfer: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading transfer: {}", e);
            }
        }
    }

    // Output final state
    let accounts = service.find_all_accounts().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    let count = service
        .transfer_count_of(ledger_id)
        .await
        .into_diagnostic()?;
    eprintln!("{} transfers completed", count);

    Ok(())
}
