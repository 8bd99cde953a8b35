//! Revenues Interchange CLI
//!
//! A thin driver around the interchange core: reads a raw source file and
//! prints normalized transactions as CSV, or reads normalized transactions
//! back and prints one export format's output text.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- classify bailiff payments.csv > normalized.csv
//! cargo run -- export housing-rents normalized.csv > CASH1.dat
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::info;
use revenues_interchange::{
    lookup, ExportContext, ExportFormat, InterchangeError, LookupTables, NormalizedTransaction,
    Result, SourceKind,
};
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let run_stamp = chrono::Local::now().naive_local();

    match args.get(1).map(String::as_str) {
        Some("classify") => {
            let (kind, path) = match (args.get(2), args.get(3)) {
                (Some(kind), Some(path)) => (kind, path),
                _ => return Err(InterchangeError::MissingArgument),
            };
            let kind: SourceKind = kind.parse()?;
            let contents = fs::read_to_string(path)?;

            let batch = kind.classify(&contents, run_stamp)?;
            info!(
                "{}: {} transactions, {} skipped",
                batch.notes,
                batch.transactions.len(),
                batch.skipped
            );

            write_normalized_csv(io::stdout().lock(), &batch.transactions)
        }
        Some("export") => {
            let (format, path) = match (args.get(2), args.get(3)) {
                (Some(format), Some(path)) => (format, path),
                _ => return Err(InterchangeError::MissingArgument),
            };
            let format: ExportFormat = format.parse()?;
            let transactions = read_normalized_csv(File::open(path)?)?;
            let tables = match args.get(4) {
                Some(dir) => load_tables(Path::new(dir))?,
                None => LookupTables::default(),
            };

            let ctx = ExportContext::new(run_stamp, &tables);
            let output = format.render(&ctx, &transactions);
            info!("suggested file name: {}", format.default_file_name(run_stamp));

            io::stdout().lock().write_all(output.as_bytes())?;
            Ok(())
        }
        _ => Err(InterchangeError::MissingArgument),
    }
}

fn write_normalized_csv<W: Write>(writer: W, transactions: &[NormalizedTransaction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for tx in transactions {
        csv_writer.serialize(tx)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn read_normalized_csv<R: io::Read>(reader: R) -> Result<Vec<NormalizedTransaction>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    for result in csv_reader.deserialize() {
        transactions.push(result?);
    }
    Ok(transactions)
}

/// Loads whichever lookup files exist under `dir`; absent files simply
/// leave that table empty.
fn load_tables(dir: &Path) -> Result<LookupTables> {
    let funds = match File::open(dir.join("funds.csv")) {
        Ok(file) => lookup::read_funds(file)?,
        Err(_) => Vec::new(),
    };
    let methods_of_payment = match File::open(dir.join("methods_of_payment.csv")) {
        Ok(file) => lookup::read_methods_of_payment(file)?,
        Err(_) => Vec::new(),
    };
    let account_holders = match File::open(dir.join("account_holders.csv")) {
        Ok(file) => lookup::read_account_holders(file)?,
        Err(_) => Vec::new(),
    };
    Ok(LookupTables::new(funds, methods_of_payment, account_holders))
}
