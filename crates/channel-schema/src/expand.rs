//! Range-to-suffix expansion for templated channel entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::ChannelEntry;
use crate::error::ResolveError;
use crate::resolver::ResolvedVariable;

/// Letter suffixes in positional order. Sensor axes are conventionally
/// x/y/z, so the letter alphabet starts at `x` and stops at `z`.
const LETTER_SUFFIXES: [&str; 3] = ["x", "y", "z"];

/// Largest probe/channel count the digit alphabet addresses.
pub const DIGIT_CAPACITY: usize = 15;

/// How a multi-ID channel entry fans out into named variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expansion {
    /// Single-ID entry, emitted under its own name.
    #[default]
    None,

    /// Positional x/y/z suffixes for multi-axis sensors.
    #[serde(alias = "xyz")]
    Letters,

    /// 1-based numeric suffixes for probe arrays.
    #[serde(alias = "123")]
    Digits,
}

impl Expansion {
    /// Number of distinct IDs this alphabet can address.
    pub fn capacity(self) -> usize {
        match self {
            Expansion::None => 1,
            Expansion::Letters => LETTER_SUFFIXES.len(),
            Expansion::Digits => DIGIT_CAPACITY,
        }
    }

    /// Suffix for an offset within the entry's ID range, or `None` when
    /// the alphabet cannot address it.
    pub fn suffix(self, offset: usize) -> Option<String> {
        match self {
            Expansion::None => None,
            Expansion::Letters => LETTER_SUFFIXES.get(offset).map(|s| (*s).to_string()),
            Expansion::Digits => (offset < DIGIT_CAPACITY).then(|| (offset + 1).to_string()),
        }
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expansion::None => "none",
            Expansion::Letters => "letters",
            Expansion::Digits => "digits",
        })
    }
}

/// Materialize the variable for one ID inside a templated entry.
///
/// Expanded siblings share the entry's metadata verbatim; the suffix is
/// appended to `long_name` as a disambiguation hint. Per-offset
/// standard names are deliberately not modeled; a schema that needs
/// distinct metadata per axis needs distinct entries.
///
/// Pure and deterministic: the same `(entry, offset)` always yields the
/// same variable.
pub fn expand(entry: &ChannelEntry, offset: u16) -> Result<ResolvedVariable, ResolveError> {
    let suffix =
        entry
            .expand
            .suffix(usize::from(offset))
            .ok_or_else(|| ResolveError::ExpansionRange {
                channel: entry.name.clone(),
                offset,
                capacity: entry.expand.capacity(),
            })?;

    let mut attributes = entry.attributes.clone();
    if !attributes.long_name.is_empty() {
        attributes.long_name = format!("{} {suffix}", attributes.long_name);
    }

    Ok(ResolvedVariable {
        variable_name: format!("{}{suffix}", entry.name),
        attributes,
        dims: entry.dims.clone(),
    })
}
