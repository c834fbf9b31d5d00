//! Error type shared by the formula parser, molar mass table, mass allocator and batch report.
use thiserror::Error;

/// error types for parsing formulas, loading molar masses and distributing masses
#[derive(Debug, Error)]
pub enum MassError {
    #[error("Formula '{formula}' contains no recognizable element symbols")]
    ParseYieldsEmpty { formula: String },
    #[error("Invalid element(s): {}", .elements.join(", "))]
    UnknownElement { elements: Vec<String> },
    #[error("The element '{element}' is not present in the formula '{formula}'")]
    ElementNotInFormula { element: String, formula: String },
    #[error("Division by zero: {quantity} is zero")]
    DegenerateDenominator { quantity: &'static str },
    #[error("Nothing to process: no valid formulas or no total masses")]
    EmptyBatchInput,
    #[error("Invalid molar mass table row {line}: {details}")]
    InvalidTableRow { line: usize, details: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
