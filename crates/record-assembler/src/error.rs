//! Error types for record assembly.

use channel_schema::ResolveError;
use thiserror::Error;

/// Result type alias for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Errors surfaced while processing records through a session.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Session is closed; no further records are accepted")]
    SessionClosed,

    /// Strict mode only: an unknown type ID aborts the session instead
    /// of being counted and skipped.
    #[error("No schema entry for type ID 0x{0:04X}")]
    UnknownId(u16),

    /// Resolution hit an invariant that load-time validation should
    /// have made unreachable (expansion offset out of range).
    #[error("Resolution invariant violated: {0}")]
    Invariant(ResolveError),

    #[error(
        "Record for '{variable}' carries {got} coordinate values; dimensions {dims:?} require {expected}"
    )]
    DimensionArity {
        variable: String,
        dims: Vec<String>,
        expected: usize,
        got: usize,
    },

    #[error(
        "Coordinate mismatch on dimension '{dim}' at index {index}: axis holds {existing}, record carries {got}"
    )]
    CoordinateMismatch {
        dim: String,
        index: usize,
        existing: f64,
        got: f64,
    },
}
