//! Reference data supplied by the transaction store, plus the per-run
//! export context.
//!
//! Funds, methods of payment and account holders are fetched once per
//! export run and are read-only for its duration. Encoders receive them
//! through [`ExportContext`] instead of any process-wide state, so
//! repeated or concurrent runs can never observe another run's data.

use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One municipal revenue stream.
#[derive(Debug, Clone, Deserialize)]
pub struct Fund {
    pub code: String,
    pub name: String,

    /// Whether the general ledger export includes this fund.
    #[serde(default)]
    pub export_to_ledger: bool,

    /// Whether ledger rows take the fund-level code below instead of an
    /// account-holder lookup.
    #[serde(default)]
    pub use_general_ledger_code: bool,

    #[serde(default)]
    pub general_ledger_code: Option<String>,
}

/// One payment channel.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodOfPayment {
    pub code: String,
    pub name: String,
}

/// One account on the income fund, carrying its ledger code.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountHolder {
    pub account_reference: String,
    pub general_ledger_code: String,
}

/// Code-keyed reference data for one export run.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    funds: HashMap<String, Fund>,
    methods_of_payment: HashMap<String, MethodOfPayment>,
    account_holders: HashMap<String, AccountHolder>,
}

impl LookupTables {
    pub fn new(
        funds: Vec<Fund>,
        methods_of_payment: Vec<MethodOfPayment>,
        account_holders: Vec<AccountHolder>,
    ) -> Self {
        LookupTables {
            funds: funds.into_iter().map(|f| (f.code.clone(), f)).collect(),
            methods_of_payment: methods_of_payment
                .into_iter()
                .map(|m| (m.code.clone(), m))
                .collect(),
            account_holders: account_holders
                .into_iter()
                .map(|a| (a.account_reference.clone(), a))
                .collect(),
        }
    }

    pub fn fund(&self, code: &str) -> Option<&Fund> {
        self.funds.get(code)
    }

    /// Fund display name, empty when the code is not configured.
    pub fn fund_name(&self, code: &str) -> &str {
        self.funds.get(code).map(|f| f.name.as_str()).unwrap_or("")
    }

    /// Method-of-payment display name, empty when the code is not configured.
    pub fn mop_name(&self, code: &str) -> &str {
        self.methods_of_payment
            .get(code)
            .map(|m| m.name.as_str())
            .unwrap_or("")
    }

    /// Ledger code held against an income-fund account, empty when unknown.
    pub fn account_holder_ledger_code(&self, account_reference: &str) -> &str {
        self.account_holders
            .get(account_reference)
            .map(|a| a.general_ledger_code.as_str())
            .unwrap_or("")
    }
}

/// Reads funds from headed CSV
/// (`code,name,export_to_ledger,use_general_ledger_code,general_ledger_code`).
pub fn read_funds<R: Read>(reader: R) -> Result<Vec<Fund>> {
    read_records(reader)
}

/// Reads methods of payment from headed CSV (`code,name`).
pub fn read_methods_of_payment<R: Read>(reader: R) -> Result<Vec<MethodOfPayment>> {
    read_records(reader)
}

/// Reads account holders from headed CSV
/// (`account_reference,general_ledger_code`).
pub fn read_account_holders<R: Read>(reader: R) -> Result<Vec<AccountHolder>> {
    read_records(reader)
}

fn read_records<R: Read, T: serde::de::DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Everything an encoder needs for one export run: the run timestamp and
/// the read-only lookup tables.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    pub run: NaiveDateTime,
    pub tables: &'a LookupTables,
}

impl<'a> ExportContext<'a> {
    pub fn new(run: NaiveDateTime, tables: &'a LookupTables) -> Self {
        ExportContext { run, tables }
    }
}
