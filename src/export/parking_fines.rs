//! Parking fine (penalty charge notice) export: one multi-line record per
//! payment behind a run-numbered header block.

use super::RowEncoder;
use crate::fields::{decimal_field, pad_left};
use crate::lookup::ExportContext;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;
use chrono::NaiveDate;

/// Epoch the receiving system numbers runs from.
const RUN_NUMBER_EPOCH: (i32, u32, u32) = (2015, 1, 1);

/// Serial prefix of the notices this export covers.
const PCN_SERIAL_PREFIX: &str = "GG6";

pub struct ParkingFinesEncoder;

#[derive(Debug, Clone)]
pub struct ParkingFineRecord {
    pub run_number: String,
    pub pcn_serial_number: String,
    pub receipt_date: String,
    pub receipt_time: String,
    pub receipt_number: String,
    pub payment_method: String,
    pub fine_paid_amount: String,
    pub fine_paid_amount_value: Money,
}

impl RowEncoder for ParkingFinesEncoder {
    type Row = ParkingFineRecord;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        tx.fund_code == "9" && tx.account_reference.starts_with(PCN_SERIAL_PREFIX)
    }

    fn to_row(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        ParkingFineRecord {
            run_number: run_number(ctx),
            pcn_serial_number: tx.account_reference.clone(),
            receipt_date: tx.transaction_date.format("%d/%m/%y").to_string(),
            receipt_time: tx.transaction_date.format("%H:%M").to_string(),
            receipt_number: tx.psp_reference.clone(),
            payment_method: payment_method(&tx.mop_code),
            fine_paid_amount: decimal_field(tx.amount, 9),
            fine_paid_amount_value: tx.amount.unwrap_or(Money::ZERO),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        let mut lines = vec![
            row.run_number.as_str(),
            "0001",
            row.pcn_serial_number.as_str(),
            row.fine_paid_amount.as_str(),
            row.receipt_date.as_str(),
            row.receipt_time.as_str(),
            row.receipt_number.as_str(),
        ];
        lines.extend(std::iter::repeat("").take(14));
        lines.extend([
            row.payment_method.as_str(),
            row.fine_paid_amount.as_str(),
            "000000.00",
            "000000.00",
            "000000.00",
            "000000.00",
            row.receipt_date.as_str(),
        ]);
        lines.join("\n")
    }

    fn render(&self, ctx: &ExportContext<'_>, batch: &[NormalizedTransaction]) -> String {
        let records: Vec<ParkingFineRecord> = batch
            .iter()
            .filter(|tx| self.filter(ctx, tx))
            .map(|tx| self.to_row(ctx, tx))
            .collect();

        let total: Money = records.iter().map(|r| r.fine_paid_amount_value).sum();

        let mut out = String::new();
        let mut push_line = |line: &str| {
            out.push_str(line);
            out.push('\n');
        };

        push_line(&run_number(ctx));
        push_line("0001");
        push_line(&pad_left(&records.len().to_string(), 4, '0'));
        push_line(&decimal_field(Some(total), 9));
        for _ in 0..23 {
            push_line("");
        }
        push_line(&ctx.run.format("%d/%m/%y").to_string());

        for record in &records {
            push_line(&self.serialize(record));
        }

        out
    }
}

/// Run number: days elapsed since the receiving system's epoch.
fn run_number(ctx: &ExportContext<'_>) -> String {
    let (year, month, day) = RUN_NUMBER_EPOCH;
    // The epoch is a valid literal date.
    let epoch = NaiveDate::from_ymd_opt(year, month, day).expect("valid epoch date");
    let days = ctx.run.date().signed_duration_since(epoch).num_days();
    pad_left(&days.to_string(), 6, '0')
}

fn payment_method(mop_code: &str) -> String {
    match mop_code {
        "19" | "20" => "BAI".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTables;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn run_stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 13)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn tx(serial: &str, amount: &str) -> NormalizedTransaction {
        let date = NaiveDate::from_ymd_opt(2025, 5, 13)
            .unwrap()
            .and_hms_opt(14, 45, 0)
            .unwrap();
        NormalizedTransaction {
            reference: String::new(),
            internal_reference: "ABCDEFGH12345678".to_string(),
            psp_reference: "PIP-20250513-99".to_string(),
            office_code: "S".to_string(),
            entry_date: run_stamp(),
            transaction_date: date,
            account_reference: serial.to_string(),
            fund_code: "9".to_string(),
            mop_code: "20".to_string(),
            amount: Some(Money::from_str(amount).unwrap()),
            vat_code: "3".to_string(),
            vat_rate: Decimal::ZERO,
            vat_amount: Money::ZERO,
            narrative: String::new(),
        }
    }

    #[test]
    fn test_filter_requires_pcn_serial_prefix() {
        let tables = LookupTables::default();
        let ctx = ExportContext::new(run_stamp(), &tables);
        let encoder = ParkingFinesEncoder;

        assert!(encoder.filter(&ctx, &tx("GG612345", "70.00")));
        assert!(!encoder.filter(&ctx, &tx("AB612345", "70.00")));

        let mut wrong_fund = tx("GG612345", "70.00");
        wrong_fund.fund_code = "2".to_string();
        assert!(!encoder.filter(&ctx, &wrong_fund));
    }

    #[test]
    fn test_run_number_counts_days_from_epoch() {
        let tables = LookupTables::default();
        let ctx = ExportContext::new(run_stamp(), &tables);
        // 2015-01-01 to 2025-05-13 inclusive of leap years 2016/2020/2024.
        assert_eq!(run_number(&ctx), "003785");
    }

    #[test]
    fn test_payment_method_maps_bailiff_channels() {
        assert_eq!(payment_method("19"), "BAI");
        assert_eq!(payment_method("20"), "BAI");
        assert_eq!(payment_method("12"), "12");
        assert_eq!(payment_method(""), "");
    }

    #[test]
    fn test_render_header_and_record_block() {
        let tables = LookupTables::default();
        let ctx = ExportContext::new(run_stamp(), &tables);
        let batch = vec![tx("GG612345", "432.15")];

        let output = ParkingFinesEncoder.render(&ctx, &batch);
        let lines: Vec<&str> = output.lines().collect();

        // header: run number, 0001, count, total, 23 blanks, date
        assert_eq!(lines[0], "003785");
        assert_eq!(lines[1], "0001");
        assert_eq!(lines[2], "0001");
        assert_eq!(lines[3], "000432.15");
        assert!(lines[4..27].iter().all(|l| l.is_empty()));
        assert_eq!(lines[27], "13/05/25");

        // record block
        assert_eq!(lines[28], "003785");
        assert_eq!(lines[29], "0001");
        assert_eq!(lines[30], "GG612345");
        assert_eq!(lines[31], "000432.15");
        assert_eq!(lines[32], "13/05/25");
        assert_eq!(lines[33], "14:45");
        assert_eq!(lines[34], "PIP-20250513-99");
        assert!(lines[35..49].iter().all(|l| l.is_empty()));
        assert_eq!(lines[49], "BAI");
        assert_eq!(lines[50], "000432.15");
        assert_eq!(lines[51], "000000.00");
        assert_eq!(lines[55], "13/05/25");
        assert_eq!(lines.len(), 56);
    }

    #[test]
    fn test_header_total_sums_records() {
        let tables = LookupTables::default();
        let ctx = ExportContext::new(run_stamp(), &tables);
        let batch = vec![tx("GG611111", "100.00"), tx("GG622222", "32.15")];

        let output = ParkingFinesEncoder.render(&ctx, &batch);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[2], "0002");
        assert_eq!(lines[3], "000132.15");
    }
}
