use thiserror::Error;

/// Errors raised while turning an alignment into features.
///
/// Unknown residue codes are not errors: they are mapped to `X`.
#[derive(Debug, Error)]
pub enum MsaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("sequence {0} not recognized")]
    InvalidSequence(String),

    #[error("numerical degeneracy in {context}: zero total at index {index}")]
    NumericalDegeneracy { context: &'static str, index: usize },

    #[error("alignment row {row} has {found} aligned positions, expected {expected}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid reference table: {0}")]
    InvalidTable(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SafeTensors(#[from] safetensors::SafeTensorError),
}

pub type Result<T> = std::result::Result<T, MsaError>;
