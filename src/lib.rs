//! # Revenues Interchange
//!
//! The transformation core of a municipal revenues interchange: classifies
//! raw payment files from bailiff, payroll-deduction and post office
//! network sources into normalized transactions, and encodes normalized
//! transactions into the legacy export formats the downstream ledgers
//! consume.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: currency amounts use 2 decimal places via
//!   `rust_decimal`
//! - **Pure encoding core**: codecs, the reference decoder and the row
//!   encoders are synchronous, side-effect free and safe to call
//!   concurrently; all I/O lives in the caller
//! - **Bit-exact layouts**: every export format's columns, fillers and
//!   headers are fixed contracts with its receiving system
//! - **Bad rows are reported, not fatal**: classifiers count and skip rows
//!   they cannot accept
//!
//! ## Example
//!
//! ```no_run
//! use revenues_interchange::{ExportContext, ExportFormat, LookupTables, SourceKind};
//!
//! let run = chrono::NaiveDate::from_ymd_opt(2025, 5, 16)
//!     .unwrap()
//!     .and_hms_opt(8, 0, 0)
//!     .unwrap();
//! let contents = "13/05/2025,521636L,1168.94,NDR,1219226\n";
//! let batch = SourceKind::Bailiff.classify(contents, run).unwrap();
//!
//! let tables = LookupTables::default();
//! let ctx = ExportContext::new(run, &tables);
//! let output = ExportFormat::CouncilTaxNndr.render(&ctx, &batch.transactions);
//! print!("{output}");
//! ```

pub mod checkdigit;
pub mod classify;
pub mod error;
pub mod export;
pub mod fields;
pub mod lookup;
pub mod money;
pub mod reference;
pub mod transaction;

pub use classify::{ClassifiedBatch, SourceKind};
pub use error::{InterchangeError, Result};
pub use export::ExportFormat;
pub use lookup::{ExportContext, LookupTables};
pub use money::Money;
pub use reference::{decode, DecodedClassification};
pub use transaction::NormalizedTransaction;
