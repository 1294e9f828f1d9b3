//! Error types for the projection engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while computing or batch-processing projections.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A calculator input violates its constraints
    #[error("Invalid input for {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: &'static str,
    },

    /// Decimal arithmetic left the representable range
    #[error("Arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing command-line argument
    #[error(
        "Missing input file argument. Usage: projection-engine <requests.csv> \
         | projection-engine schedule <monthly> <rate> <years> [step_up] [lump_sum]"
    )]
    MissingArgument,

    /// Schedule mode was given too few arguments
    #[error(
        "Missing {name} argument. Usage: projection-engine schedule \
         <monthly> <rate> <years> [step_up] [lump_sum]"
    )]
    MissingScheduleArgument { name: &'static str },

    /// Command-line argument that is not a valid number
    #[error("Invalid value for {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, message: &'static str) -> Self {
        EngineError::InvalidInput { field, message }
    }

    /// Returns `true` for constraint violations on calculator inputs.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EngineError::InvalidInput { .. })
    }
}
