//! Export row encoders: one per downstream destination format.
//!
//! Every encoder is pure over `(context, batch)`: rendering the same
//! batch twice is byte-identical. Each format's column layout, literal
//! fillers and header construction are bit-exact contracts with its
//! legacy system.

pub mod council_tax;
pub mod general_ledger;
pub mod hb_overpayments;
pub mod parking_fines;
pub mod rents;
pub mod sme_professional;
pub mod sundry_debtors;

use crate::error::{InterchangeError, Result};
use crate::lookup::ExportContext;
use crate::transaction::NormalizedTransaction;
use chrono::NaiveDateTime;
use std::str::FromStr;

/// The shared encoder contract: a filter predicate, row construction and
/// text serialization.
///
/// `render` is the whole-batch entry point. The default implementation is
/// one line per accepted transaction after an optional header; formats
/// that aggregate or emit multi-line records override it.
pub trait RowEncoder {
    type Row;

    /// Whether this format accepts the transaction.
    fn filter(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool;

    /// Builds the format's row from one transaction.
    fn to_row(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row;

    /// Serializes one row to text, without a line terminator.
    fn serialize(&self, row: &Self::Row) -> String;

    /// Optional header line.
    fn header(&self, _ctx: &ExportContext<'_>) -> Option<String> {
        None
    }

    /// Renders the whole batch to the format's output text.
    fn render(&self, ctx: &ExportContext<'_>, batch: &[NormalizedTransaction]) -> String {
        let mut out = String::new();
        if let Some(header) = self.header(ctx) {
            out.push_str(&header);
            out.push('\n');
        }
        for tx in batch.iter().filter(|tx| self.filter(ctx, tx)) {
            out.push_str(&self.serialize(&self.to_row(ctx, tx)));
            out.push('\n');
        }
        out
    }
}

/// The closed set of destination formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    CouncilTaxNndr,
    GeneralLedger,
    HousingRents,
    HousingBenefitOverpayments,
    SmeProfessional,
    SundryDebtors,
    ParkingFines,
}

impl ExportFormat {
    /// Renders a batch of normalized transactions to this format's output
    /// text.
    pub fn render(&self, ctx: &ExportContext<'_>, batch: &[NormalizedTransaction]) -> String {
        match self {
            ExportFormat::CouncilTaxNndr => council_tax::CouncilTaxNndrEncoder.render(ctx, batch),
            ExportFormat::GeneralLedger => general_ledger::GeneralLedgerEncoder.render(ctx, batch),
            ExportFormat::HousingRents => rents::RentsEncoder.render(ctx, batch),
            ExportFormat::HousingBenefitOverpayments => {
                hb_overpayments::HbOverpaymentsEncoder.render(ctx, batch)
            }
            ExportFormat::SmeProfessional => {
                sme_professional::SmeProfessionalEncoder.render(ctx, batch)
            }
            ExportFormat::SundryDebtors => sundry_debtors::SundryDebtorsEncoder.render(ctx, batch),
            ExportFormat::ParkingFines => parking_fines::ParkingFinesEncoder.render(ctx, batch),
        }
    }

    /// File name each destination system expects for a run started at `run`.
    pub fn default_file_name(&self, run: NaiveDateTime) -> String {
        match self {
            ExportFormat::CouncilTaxNndr => "IWORLD.pay".to_string(),
            ExportFormat::GeneralLedger => {
                format!("GLINC{}.csv", run.format("%d-%m-%Y-%H-%M-%S"))
            }
            ExportFormat::HousingRents => "CASH1.dat".to_string(),
            ExportFormat::HousingBenefitOverpayments => "PAYMENTS.dat".to_string(),
            ExportFormat::SmeProfessional => {
                format!("GBCLettings_{}.csv", run.format("%d-%b-%y"))
            }
            ExportFormat::SundryDebtors => format!("SDPAY{}.txt", run.format("%d")),
            ExportFormat::ParkingFines => format!("PCN{}.dat", run.format("%d-%m-%Y")),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = InterchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "council-tax-nndr" => Ok(ExportFormat::CouncilTaxNndr),
            "general-ledger" => Ok(ExportFormat::GeneralLedger),
            "housing-rents" => Ok(ExportFormat::HousingRents),
            "hb-overpayments" => Ok(ExportFormat::HousingBenefitOverpayments),
            "sme-professional" => Ok(ExportFormat::SmeProfessional),
            "sundry-debtors" => Ok(ExportFormat::SundryDebtors),
            "parking-fines" => Ok(ExportFormat::ParkingFines),
            other => Err(InterchangeError::UnknownExportFormat(other.to_string())),
        }
    }
}
