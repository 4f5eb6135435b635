//! Error types for schema loading and type-ID resolution.

use thiserror::Error;

use crate::expand::Expansion;

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Malformed or inconsistent schema. Always fatal at load time, so an
/// ambiguous ID map can never reach record processing.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse schema document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate channel name: '{0}'")]
    DuplicateName(String),

    #[error("Channel '{channel}': invalid type ID '{value}'")]
    InvalidTypeId { channel: String, value: String },

    #[error("Channel '{channel}': type ID {value} exceeds 0xFFFF")]
    TypeIdOutOfRange { channel: String, value: u64 },

    #[error("Channel '{channel}': ID range has {count} bounds, expected one or two")]
    BadBoundCount { channel: String, count: usize },

    #[error("Channel '{channel}': inverted ID range 0x{low:04X}..0x{high:04X}")]
    InvertedRange { channel: String, low: u16, high: u16 },

    #[error("Channels '{first}' and '{second}' claim overlapping ID ranges")]
    OverlappingRanges { first: String, second: String },

    #[error("Channel '{0}' spans multiple type IDs but declares no expansion alphabet")]
    MissingExpansion(String),

    #[error("Channel '{0}' claims a single type ID but declares an expansion alphabet")]
    UnexpectedExpansion(String),

    #[error(
        "Channel '{channel}' spans {width} IDs but the '{alphabet}' alphabet addresses at most {capacity}"
    )]
    RangeTooWide {
        channel: String,
        width: usize,
        alphabet: Expansion,
        capacity: usize,
    },

    #[error("Channel '{0}' declares no dimensions")]
    EmptyDims(String),
}

/// Failure to resolve one type ID at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The ID has no owning schema entry. Skip-vs-abort is the
    /// caller's policy, never decided here.
    #[error("No schema entry for type ID 0x{0:04X}")]
    UnknownId(u16),

    /// An offset the declared alphabet cannot address. Load-time
    /// validation makes this unreachable; seeing it means the schema
    /// validator has a gap, so it is surfaced loudly, never skipped.
    #[error("Channel '{channel}': expansion offset {offset} exceeds alphabet capacity {capacity}")]
    ExpansionRange {
        channel: String,
        offset: u16,
        capacity: usize,
    },
}
