//! Classifier for employer payroll-deduction batches.

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

/// One row of a payroll-deduction file: headerless CSV with positional
/// columns.
#[derive(Debug, Deserialize)]
struct PayrollRecord {
    /// dd/MM/yyyy
    transaction_date: String,
    customer_reference: Option<String>,
    amount: String,
    fund_name: Option<String>,
    #[allow(dead_code)]
    pay_element: Option<String>,
    employee_name_number: Option<String>,
}

/// Classifies a payroll-deduction file's contents into normalized
/// transactions.
pub fn classify(contents: &str, run: NaiveDateTime) -> Result<ClassifiedBatch> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for (row_idx, result) in csv_reader.deserialize::<PayrollRecord>().enumerate() {
        let row_number = row_idx + 1;
        match result {
            Ok(record) => match convert(&record, row_number, run) {
                Some(tx) => transactions.push(tx),
                None => {
                    warn!("Row {}: failed to parse payroll deduction record", row_number);
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
        import_type_id: 4,
        notes: "Imported from Payroll Deductions File".to_string(),
        transactions,
        skipped,
    })
}

fn convert(
    record: &PayrollRecord,
    row_number: usize,
    run: NaiveDateTime,
) -> Option<NormalizedTransaction> {
    let transaction_date = NaiveDate::parse_from_str(&record.transaction_date, "%d/%m/%Y")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    let amount = Money::from_str(&record.amount).ok()?;

    let mut tx = NormalizedTransaction {
        reference: String::new(),
        internal_reference: internal_reference(),
        psp_reference: format!("PYD-{}-{}", run.format("%y%m%d"), row_number),
        office_code: "S".to_string(),
        entry_date: run,
        transaction_date,
        account_reference: record.customer_reference.clone().unwrap_or_default(),
        fund_code: String::new(),
        mop_code: "51".to_string(),
        amount: Some(amount),
        vat_code: "1".to_string(),
        vat_rate: Decimal::ZERO,
        vat_amount: Money::ZERO,
        narrative: record.employee_name_number.clone().unwrap_or_default(),
    };

    apply_fund_details(&mut tx, fund_details(record.fund_name.as_deref().unwrap_or("")));
    Some(tx)
}

/// Fund names the payroll office uses. All currently share the same VAT
/// treatment.
fn fund_details(fund_name: &str) -> Option<FundDetails> {
    let details = |fund_code| FundDetails {
        fund_code,
        vat_code: "3",
        vat_rate: Decimal::ZERO,
    };

    match fund_name {
        "Council Tax" => Some(details("2")),
        "HB Overpayment" => Some(details("6")),
        "Housing Rents" => Some(details("8")),
        "Income" => Some(details("10")),
        _ => None,
    }
}
