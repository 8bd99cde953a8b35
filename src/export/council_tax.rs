//! Council tax / non-domestic rates export: fixed-width rows behind a
//! timestamped header line.

use super::RowEncoder;
use crate::fields::{check_digit_suffix, clip_or_pad_right, decimal_field, filler, is_blank, pad_left};
use crate::lookup::ExportContext;
use crate::transaction::NormalizedTransaction;

pub struct CouncilTaxNndrEncoder;

#[derive(Debug, Clone)]
pub struct CouncilTaxNndrRow {
    pub icm_ref: String,
    pub trans_date: String,
    pub amount: String,
    pub account_number: String,
    pub check_digit: String,
    pub method_of_payment: String,
    pub liability_number: String,
    pub fund: String,
}

impl RowEncoder for CouncilTaxNndrEncoder {
    type Row = CouncilTaxNndrRow;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        matches!(tx.fund_code.as_str(), "2" | "5")
    }

    fn header(&self, ctx: &ExportContext<'_>) -> Option<String> {
        Some(format!(
            "{}*{}00002{}",
            ctx.run.format("%d %b %Y"),
            ctx.run.format("%H:%M:%S"),
            filler(26)
        ))
    }

    fn to_row(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        CouncilTaxNndrRow {
            icm_ref: clip_or_pad_right(&tx.psp_reference, 18),
            trans_date: tx.transaction_date.format("%d-%b-%Y").to_string(),
            amount: decimal_field(tx.amount, 14),
            account_number: account_number(&tx.account_reference),
            check_digit: check_digit_suffix(&tx.account_reference),
            method_of_payment: method_of_payment(&tx.mop_code),
            liability_number: liability_number(&tx.narrative),
            fund: fund(&tx.fund_code),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}{}{}{}",
            row.account_number,
            filler(9),
            row.check_digit,
            filler(2),
            row.method_of_payment,
            row.amount,
            row.fund,
            row.trans_date,
            filler(20),
            row.icm_ref,
            filler(65),
            row.liability_number
        )
    }
}

/// First six characters of the account reference (the check digit and any
/// overflow are dropped).
fn account_number(account_reference: &str) -> String {
    if is_blank(account_reference) {
        return "000000".to_string();
    }
    account_reference.trim().chars().take(6).collect()
}

fn fund(fund_code: &str) -> String {
    match fund_code {
        "2" => "CT".to_string(),
        "5" => "NN".to_string(),
        other => other.to_string(),
    }
}

fn method_of_payment(mop_code: &str) -> String {
    if is_blank(mop_code) {
        return "00  ".to_string();
    }
    match mop_code {
        "46" | "47" => "WS",
        "5" => "TP",
        "12" => "PP",
        "1" => "K1",
        "48" | "49" => "K2",
        other => other,
    }
    .to_string()
}

/// Bailiff-collected payments carry the liability number at the front of
/// the narrative.
fn liability_number(narrative: &str) -> String {
    if is_blank(narrative) {
        return String::new();
    }
    if narrative.contains("Liability") {
        let prefix: String = narrative.chars().take(7).collect();
        pad_left(&prefix, 10, ' ')
    } else {
        filler(10)
    }
}
