use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum LedgerError {
    #[error("invalid record: {field}: {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no transaction at position {0}")]
    IndexOutOfRange(usize),

    #[error("no transaction with id {0}")]
    UnknownId(i64),

    #[error("ledger file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger file corrupt at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

/// Errors raised when a bulk-loaded table fails schema checks.
/// The ledger is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: cannot parse date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("row {row}: column '{column}' has invalid amount '{value}'")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },
}

impl LedgerError {
    /// True for failures of the backing file rather than of the input.
    /// The in-memory ledger is still authoritative after one of these;
    /// callers may retry `Ledger::save`.
    pub(crate) fn is_persistence(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Csv(_) | Self::Corrupt { .. })
    }
}

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;
