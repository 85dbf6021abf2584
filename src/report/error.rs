use thiserror::Error;

/// Result type alias using `ReportError`.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors produced by the report engine. Every variant is caught by the
/// dashboard and shown as a banner; none of them abort the process.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The uploaded bytes could not be parsed in the indicated format.
    #[error("Failed to parse file: {0}")]
    Parse(String),

    /// The parsed table is missing required columns.
    #[error(
        "File must contain columns Year, Category, Amount (missing: {}). Columns found: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A row could not be folded into an aggregate, e.g. a non-numeric
    /// Amount cell.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),
}
