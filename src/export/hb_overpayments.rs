//! Housing benefit overpayments file: fixed-width rows with a credit
//! indicator column.

use super::RowEncoder;
use crate::fields::{clip_or_pad_right, filler, is_blank, minor_units, pad_left};
use crate::lookup::ExportContext;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;

pub struct HbOverpaymentsEncoder;

#[derive(Debug, Clone)]
pub struct HbOverpaymentsRow {
    pub icm_ref: String,
    pub trans_date: String,
    pub credit_indicator: String,
    pub amount: String,
    pub account_number: String,
}

impl RowEncoder for HbOverpaymentsEncoder {
    type Row = HbOverpaymentsRow;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        tx.fund_code == "6"
    }

    fn to_row(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        HbOverpaymentsRow {
            icm_ref: clip_or_pad_right(&tx.psp_reference, 12),
            trans_date: tx.transaction_date.format("%d%m%y").to_string(),
            credit_indicator: credit_indicator(tx.amount),
            amount: minor_units(tx.amount, 11),
            account_number: account_number(&tx.account_reference),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}",
            filler(4),
            row.icm_ref,
            filler(8),
            row.trans_date,
            row.amount,
            row.credit_indicator,
            filler(7),
            row.account_number,
            filler(36)
        )
    }
}

fn credit_indicator(amount: Option<Money>) -> String {
    match amount {
        Some(a) if a.is_negative() => "Y".to_string(),
        _ => " ".to_string(),
    }
}

fn account_number(account_reference: &str) -> String {
    if is_blank(account_reference) {
        return "00000000".to_string();
    }
    pad_left(account_reference.trim(), 11, ' ')
}
