//! Classifier for court-enforcement (bailiff) collection batches.

use super::{apply_fund_details, internal_reference, ClassifiedBatch, FundDetails};
use crate::error::Result;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// One row of a bailiff remittance file: headerless CSV with positional
/// columns.
#[derive(Debug, Deserialize)]
struct BailiffRecord {
    /// dd/MM/yyyy
    transaction_date: String,
    customer_reference: Option<String>,
    amount: String,
    fund_name: Option<String>,
    liability_order_number: Option<String>,
}

/// Classifies a bailiff file's contents into normalized transactions.
pub fn classify(contents: &str, run: NaiveDateTime) -> Result<ClassifiedBatch> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for (row_idx, result) in csv_reader.deserialize::<BailiffRecord>().enumerate() {
        let row_number = row_idx + 1;
        match result {
            Ok(record) => match convert(&record, row_number, run) {
                Some(tx) => transactions.push(tx),
                None => {
                    warn!("Row {}: failed to parse bailiff record", row_number);
                    skipped += 1;
                }
            },
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_number, e);
                skipped += 1;
            }
        }
    }

    Ok(ClassifiedBatch {
        import_type_id: 3,
        notes: "Imported from Bailiff File".to_string(),
        transactions,
        skipped,
    })
}

fn convert(
    record: &BailiffRecord,
    row_number: usize,
    run: NaiveDateTime,
) -> Option<NormalizedTransaction> {
    let transaction_date = NaiveDate::parse_from_str(&record.transaction_date, "%d/%m/%Y")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    let amount = Money::from_str(&record.amount).ok()?;
    let customer_reference = record.customer_reference.clone().unwrap_or_default();
    let liability = record.liability_order_number.as_deref().unwrap_or_default();

    let mut tx = NormalizedTransaction {
        reference: customer_reference.clone(),
        internal_reference: internal_reference(),
        psp_reference: format!("BLF-{}-{}", run.format("%y%m%d"), row_number),
        office_code: "S".to_string(),
        entry_date: run,
        transaction_date,
        account_reference: customer_reference,
        fund_code: String::new(),
        mop_code: "20".to_string(),
        amount: Some(amount),
        vat_code: "1".to_string(),
        vat_rate: Decimal::ZERO,
        vat_amount: Money::ZERO,
        narrative: format!("{liability} (Liability order number)"),
    };

    apply_fund_details(&mut tx, fund_details(record.fund_name.as_deref().unwrap_or("")));
    Some(tx)
}

/// Fund names a bailiff remittance can carry. All currently share the same
/// VAT treatment; kept as a table so a divergence is a one-line change.
fn fund_details(fund_name: &str) -> Option<FundDetails> {
    let details = |fund_code| FundDetails {
        fund_code,
        vat_code: "3",
        vat_rate: Decimal::ZERO,
    };

    match fund_name {
        "Council Tax" => Some(details("2")),
        "NDR" => Some(details("5")),
        "Benefit Overpayment" => Some(details("6")),
        "Sundry Debt" => Some(details("7")),
        "PCN" => Some(details("9")),
        _ => None,
    }
}
