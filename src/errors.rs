use thiserror::Error;

use crate::ledger::grid::Position;
use crate::stats::Column;

/// Failures raised by the category grid and its ledgers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Invalid category name `{0}`")]
    InvalidName(String),
    #[error("Invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("Invalid {field} field `{value}`")]
    InvalidField { field: &'static str, value: String },
    #[error("Category grid is full ({rows}x{cols})")]
    GridFull { rows: usize, cols: usize },
    #[error("No category at position {0}")]
    NotFound(Position),
    #[error("Entry index {index} out of range (category has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No category selected")]
    NoSelection,
    #[error("Month {0} is outside 1-12")]
    InvalidMonth(u32),
    #[error("Invalid grid position `{0}`")]
    InvalidPosition(String),
    #[error("Grid shape must have 1-32 rows and columns, got {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },
}

/// Failures raised while aggregating entries for charts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatsError {
    #[error("No data to plot")]
    EmptyDataset,
    #[error("Dataset has no `{0}` column")]
    MissingColumn(Column),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Failures raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Umbrella error for callers that touch several layers at once.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = FinanceError> = std::result::Result<T, E>;
