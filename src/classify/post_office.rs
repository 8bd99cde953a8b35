//! Classifier for post office payment-network batches.
//!
//! Unlike the other sources, fund code and account reference come
//! exclusively from decoding the network reference string; the file's own
//! fund column is ignored.

use super::{internal_reference, ClassifiedBatch};
use crate::error::Result;
use crate::money::Money;
use crate::reference;
use crate::transaction::NormalizedTransaction;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// One row of a network settlement file. Positional columns, no header row
/// (the file's banner and trailer lines are stripped before parsing);
/// trailing columns are frequently absent.
#[derive(Debug, Deserialize)]
struct PostOfficeRecord {
    transaction_status: String,
    #[allow(dead_code)]
    transaction_type: String,
    /// ddMMyyyy HHmmss
    transaction_date: String,
    continuous_audit_number: String,
    #[allow(dead_code)]
    group_number: Option<String>,
    #[allow(dead_code)]
    client_id: Option<String>,
    #[allow(dead_code)]
    line_id: Option<String>,
    reference_number: Option<String>,
    amount: String,
    #[allow(dead_code)]
    vat_amount: Option<String>,
    #[allow(dead_code)]
    partial_bank_account: Option<String>,
    #[allow(dead_code)]
    bank_sort_code: Option<String>,
    #[allow(dead_code)]
    bacs_reference: Option<String>,
    #[allow(dead_code)]
    partial_card_number: Option<String>,
    #[allow(dead_code)]
    payment_description: Option<String>,
    #[allow(dead_code)]
    card_holder_name: Option<String>,
    psp_reference: Option<String>,
    payment_source: Option<String>,
    payment_method: Option<String>,
}

/// Classifies a network settlement file's contents into normalized
/// transactions.
pub fn classify(contents: &str, run: NaiveDateTime) -> Result<ClassifiedBatch> {
    let body = strip_banner_and_trailer(contents);

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut transactions = Vec::new();
    let mut skipped = 0;

    for (row_idx, result) in csv_reader.deserialize::<PostOfficeRecord>().enumerate() {
        let row_number = row_idx + 1;
        match result {
            Ok(record) => {
                if is_rejected(&record.transaction_status) {
                    warn!(
                        "Row {}: excluding {} settlement row",
                        row_number, record.transaction_status
                    );
                    skipped += 1;
                    continue;
                }
                match convert(&record, run) {
                    Some(tx) => transactions.push(tx),
                    None => {
                        warn!("Row {}: failed to parse settlement record", row_number);
                        skipped += 1;
                    }
                }
            }
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_number, e);
                skipped += 1;
            }
        }
    }

    Ok(ClassifiedBatch {
        import_type_id: 1,
        notes: "Imported from PIPostOffice File".to_string(),
        transactions,
        skipped,
    })
}

/// The first line is a banner and the last two are totals; only the lines
/// between them are records.
fn strip_banner_and_trailer(contents: &str) -> String {
    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() <= 3 {
        return String::new();
    }
    lines[1..lines.len() - 2].join("\n")
}

/// Rows the network has already flagged are excluded, not failed.
fn is_rejected(status: &str) -> bool {
    status.eq_ignore_ascii_case("duplicate") || status.eq_ignore_ascii_case("error")
}

fn convert(record: &PostOfficeRecord, run: NaiveDateTime) -> Option<NormalizedTransaction> {
    let transaction_date =
        NaiveDateTime::parse_from_str(&record.transaction_date, "%d%m%Y %H%M%S").ok()?;
    let amount = Money::from_str(&record.amount).ok()?;

    let raw_reference = record.reference_number.clone().unwrap_or_default();
    let decoded = reference::decode(&raw_reference);

    let source = record.payment_source.as_deref().unwrap_or_default();
    let method = record.payment_method.as_deref().unwrap_or_default();

    Some(NormalizedTransaction {
        reference: raw_reference,
        internal_reference: record
            .psp_reference
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(internal_reference),
        psp_reference: format!(
            "PIP-{}-{}",
            run.format("%Y%m%d"),
            record.continuous_audit_number
        ),
        office_code: "S".to_string(),
        entry_date: run,
        transaction_date,
        account_reference: decoded.account_reference,
        fund_code: decoded.fund_code,
        mop_code: "12".to_string(),
        amount: Some(amount),
        vat_code: "2".to_string(),
        vat_rate: Decimal::ZERO,
        vat_amount: Money::ZERO,
        narrative: format!("{source} - {method}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run_stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 16)
            .unwrap()
            .and_hms_opt(8, 10, 48)
            .unwrap()
    }

    fn settlement_file(rows: &[&str]) -> String {
        let mut lines = vec!["BANNER LINE"];
        lines.extend_from_slice(rows);
        lines.push("TOTALS,1");
        lines.push("END");
        lines.join("\n")
    }

    const ROW_RENTS: &str = "Paid,Payment,13052025 103000,4711,1,CL1,L1,\
98265029000800950031019,55.25,0,,,,,Counter payment,,PSP123456,Post Office,Cash";

    #[test]
    fn test_classify_settlement_row() {
        let contents = settlement_file(&[ROW_RENTS]);
        let batch = classify(&contents, run_stamp()).unwrap();
        assert_eq!(batch.import_type_id, 1);
        assert_eq!(batch.notes, "Imported from PIPostOffice File");
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.transactions.len(), 1);

        let tx = &batch.transactions[0];
        assert_eq!(tx.reference, "98265029000800950031019");
        assert_eq!(tx.fund_code, "8");
        assert_eq!(tx.account_reference, "95003101A");
        assert_eq!(tx.mop_code, "12");
        assert_eq!(tx.vat_code, "2");
        assert_eq!(tx.internal_reference, "PSP123456");
        assert_eq!(tx.psp_reference, "PIP-20250516-4711");
        assert_eq!(tx.narrative, "Post Office - Cash");
        assert_eq!(tx.amount.unwrap().to_string(), "55.25");
        assert_eq!(
            tx.transaction_date,
            NaiveDate::from_ymd_opt(2025, 5, 13)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_duplicate_and_error_rows_are_counted_not_raised() {
        let duplicate = ROW_RENTS.replacen("Paid", "Duplicate", 1);
        let errored = ROW_RENTS.replacen("Paid", "Error", 1);
        let contents = settlement_file(&[ROW_RENTS, &duplicate, &errored]);

        let batch = classify(&contents, run_stamp()).unwrap();
        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.skipped, 2);
    }

    #[test]
    fn test_banner_and_trailer_are_stripped() {
        let contents = settlement_file(&[]);
        let batch = classify(&contents, run_stamp()).unwrap();
        assert!(batch.transactions.is_empty());
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_non_network_reference_leaves_classification_empty() {
        let row = ROW_RENTS.replacen("98265029000800950031019", "OTHERREF01", 1);
        let contents = settlement_file(&[row.as_str()]);
        let batch = classify(&contents, run_stamp()).unwrap();

        let tx = &batch.transactions[0];
        assert_eq!(tx.fund_code, "");
        assert_eq!(tx.account_reference, "");
    }

    #[test]
    fn test_bad_date_is_skipped() {
        let row = ROW_RENTS.replacen("13052025 103000", "13-05-2025", 1);
        let contents = settlement_file(&[row.as_str()]);
        let batch = classify(&contents, run_stamp()).unwrap();
        assert!(batch.transactions.is_empty());
        assert_eq!(batch.skipped, 1);
    }
}
