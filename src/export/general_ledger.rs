//! General ledger export: an 8-column tabular file combining per-transaction
//! postings with per-(date, method-of-payment) control totals.
//!
//! Every accepted transaction posts both sides: a negative net row against
//! the fund's income code and a positive gross row against the suspense
//! code, with VAT split out to its own code. The control totals mirror the
//! gross side so the ledger balances per banking day and channel.

use super::RowEncoder;
use crate::fields::Narrative;
use crate::lookup::ExportContext;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Suspense code gross postings and their control totals balance against.
const SUSPENSE_CODE: &str = "Z001/L0030";

/// Code VAT portions are posted to.
const VAT_CODE: &str = "Z840/L0013";

/// Fund code whose ledger codes live on the account holder, not the fund.
const INCOME_FUND: &str = "10";

/// Channels settled outside the banking file, excluded from control totals.
const EXCLUDED_MOP_CODES: [&str; 2] = ["19", "22"];

/// The fixed column header every ledger import expects.
pub const COLUMNS: [&str; 8] = [
    "Year",
    "Period",
    "Date",
    "Code",
    "Amount",
    "Reference",
    "Analysis",
    "Narrative",
];

pub struct GeneralLedgerEncoder;

#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub year: i32,
    pub period: u32,
    pub date: String,
    pub code: String,
    pub amount: Money,
    pub reference: String,
    pub analysis: String,
    pub narrative: String,
}

impl RowEncoder for GeneralLedgerEncoder {
    type Row = LedgerRow;

    fn filter(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        ctx.tables
            .fund(&tx.fund_code)
            .map(|f| f.export_to_ledger)
            .unwrap_or(false)
    }

    /// The income-side posting: net amount, negated, against the fund's
    /// ledger code.
    fn to_row(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        LedgerRow {
            year: fiscal_year(ctx.run.date()),
            period: fiscal_period(ctx.run.date()),
            date: tx.transaction_date.format("%d/%m/%Y").to_string(),
            code: income_ledger_code(ctx, tx),
            amount: -tx.net_amount(),
            reference: tx.account_reference.trim().to_string(),
            analysis: ctx.tables.fund_name(&tx.fund_code).to_string(),
            narrative: narrative(ctx, tx),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_row(&mut writer, row);
        let bytes = writer.into_inner().unwrap_or_default();
        String::from_utf8_lossy(&bytes).trim_end().to_string()
    }

    fn render(&self, ctx: &ExportContext<'_>, batch: &[NormalizedTransaction]) -> String {
        let accepted: Vec<&NormalizedTransaction> =
            batch.iter().filter(|tx| self.filter(ctx, tx)).collect();

        let mut rows: Vec<LedgerRow> = Vec::new();

        for tx in &accepted {
            rows.push(self.to_row(ctx, tx));
        }
        for tx in accepted.iter().filter(|tx| !tx.vat_amount.is_zero()) {
            rows.push(vat_row(ctx, tx));
        }
        for ((date, mop_code), total) in control_totals(&accepted) {
            rows.push(control_row(ctx, date, &mop_code, -total, SUSPENSE_CODE));
        }
        for tx in &accepted {
            rows.push(gross_row(ctx, tx));
        }
        for ((date, mop_code), total) in control_totals(&accepted) {
            rows.push(control_row(ctx, date, &mop_code, total, &channel_code(&mop_code)));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        // The writer only fails on I/O, and Vec<u8> has none.
        let _ = writer.write_record(COLUMNS);
        for row in &rows {
            write_row(&mut writer, row);
        }
        let bytes = writer.into_inner().unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

fn write_row(writer: &mut csv::Writer<Vec<u8>>, row: &LedgerRow) {
    let _ = writer.write_record([
        row.year.to_string(),
        row.period.to_string(),
        row.date.clone(),
        row.code.clone(),
        row.amount.to_string(),
        row.reference.clone(),
        row.analysis.clone(),
        row.narrative.clone(),
    ]);
}

/// VAT split: the VAT portion, negated, against the VAT code.
fn vat_row(ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> LedgerRow {
    LedgerRow {
        year: fiscal_year(ctx.run.date()),
        period: fiscal_period(ctx.run.date()),
        date: tx.transaction_date.format("%d/%m/%Y").to_string(),
        code: VAT_CODE.to_string(),
        amount: -tx.vat_amount,
        reference: tx.account_reference.trim().to_string(),
        analysis: ctx.tables.fund_name(&tx.fund_code).to_string(),
        narrative: narrative(ctx, tx),
    }
}

/// The suspense-side posting: the gross amount against the suspense code.
fn gross_row(ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> LedgerRow {
    LedgerRow {
        year: fiscal_year(ctx.run.date()),
        period: fiscal_period(ctx.run.date()),
        date: tx.transaction_date.format("%d/%m/%Y").to_string(),
        code: SUSPENSE_CODE.to_string(),
        amount: tx.amount.unwrap_or(Money::ZERO),
        reference: tx.account_reference.trim().to_string(),
        analysis: ctx.tables.fund_name(&tx.fund_code).to_string(),
        narrative: narrative(ctx, tx),
    }
}

/// Sums gross amounts per (transaction date, method of payment), skipping
/// the excluded channels. Ordered by key so output is reproducible.
fn control_totals(
    accepted: &[&NormalizedTransaction],
) -> BTreeMap<(NaiveDate, String), Money> {
    let mut totals = BTreeMap::new();
    for tx in accepted {
        if EXCLUDED_MOP_CODES.contains(&tx.mop_code.as_str()) {
            continue;
        }
        let key = (tx.transaction_date.date(), tx.mop_code.clone());
        let entry = totals.entry(key).or_insert(Money::ZERO);
        *entry += tx.amount.unwrap_or(Money::ZERO);
    }
    totals
}

fn control_row(
    ctx: &ExportContext<'_>,
    date: NaiveDate,
    mop_code: &str,
    amount: Money,
    code: &str,
) -> LedgerRow {
    LedgerRow {
        year: fiscal_year(ctx.run.date()),
        period: fiscal_period(ctx.run.date()),
        date: ctx.run.format("%d/%m/%Y").to_string(),
        code: code.to_string(),
        amount,
        reference: String::new(),
        analysis: String::new(),
        narrative: format!(
            "MOP: ({mop_code}); TrDate:{}",
            date.format("%d/%m/%Y")
        ),
    }
}

/// Ledger code the income-side posting goes to.
fn income_ledger_code(ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> String {
    if let Some(fund) = ctx.tables.fund(&tx.fund_code) {
        if fund.use_general_ledger_code {
            return fund.general_ledger_code.clone().unwrap_or_default();
        }
    }
    if tx.fund_code == INCOME_FUND {
        return ctx
            .tables
            .account_holder_ledger_code(&tx.account_reference)
            .to_string();
    }
    String::new()
}

/// Control-total code for a payment channel.
fn channel_code(mop_code: &str) -> String {
    match mop_code.len() {
        1 => format!("X70{mop_code}/L9820"),
        _ => format!("X7{mop_code}/L9820"),
    }
}

fn narrative(ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> String {
    let mop_name = ctx.tables.mop_name(&tx.mop_code);
    Narrative::new()
        .field("PayRef", &tx.psp_reference)
        .field("FundCode", &tx.fund_code)
        .raw(&format!("MOP:{} ", tx.mop_code))
        .raw(&format!("{mop_name}({}); ", tx.mop_code))
        .field("TrDate", &tx.transaction_date.format("%d/%m/%Y").to_string())
        .field("PostDate", &tx.entry_date.format("%d/%m/%Y").to_string())
        .finish()
}

/// Fiscal period for a run date: April is period 1.
fn fiscal_period(run: NaiveDate) -> u32 {
    let month = run.month();
    if month < 4 {
        month + 9
    } else {
        month - 3
    }
}

/// Fiscal year label for a run date: the year the fiscal year ends in.
fn fiscal_year(run: NaiveDate) -> i32 {
    if run.month() < 4 {
        run.year()
    } else {
        run.year() + 1
    }
}
