//! Error types for the interchange core.

use thiserror::Error;

/// Result type alias for interchange operations
pub type Result<T> = std::result::Result<T, InterchangeError>;

/// Errors that can occur while classifying or encoding transactions.
#[derive(Error, Debug)]
pub enum InterchangeError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Check-digit input had the wrong length or a non-digit character
    #[error("check digit input for {scheme} must be exactly {expected} digits, got {input:?}")]
    InvalidCheckDigitInput {
        scheme: &'static str,
        expected: usize,
        input: String,
    },

    /// Computed check value has no entry in the scheme's letter map
    #[error("check value {value} is outside the letter map of {scheme}")]
    CheckDigitRange { scheme: &'static str, value: u32 },

    /// Unknown source kind name on the command line
    #[error("unknown source kind {0:?}; expected bailiff, payroll or post-office")]
    UnknownSourceKind(String),

    /// Unknown export format name on the command line
    #[error("unknown export format {0:?}")]
    UnknownExportFormat(String),

    /// Missing command-line arguments
    #[error(
        "missing arguments. Usage: revenues-interchange classify <source-kind> <file> | export <format> <file> [lookup-dir]"
    )]
    MissingArgument,
}
