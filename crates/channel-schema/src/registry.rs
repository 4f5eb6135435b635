//! Immutable channel registry with range-ordered ID lookup.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::entry::{ChannelEntry, SchemaDoc};
use crate::error::{Result, SchemaError};
use crate::expand::Expansion;

/// Immutable registry of channel entries.
///
/// Built once at startup; safe to share read-only across concurrent
/// sessions since nothing mutates it after load. Entries are kept
/// sorted by range start with disjoint ranges, so every ID in
/// `0..=0xFFFF` maps to at most one entry.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<ChannelEntry>,
}

impl Registry {
    /// Load a registry from a YAML schema document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a YAML schema document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let doc: SchemaDoc = serde_yaml::from_str(text)?;
        let entries = doc
            .0
            .into_iter()
            .map(|(name, raw)| raw.into_entry(&name))
            .collect::<Result<Vec<_>>>()?;
        Self::from_entries(entries)
    }

    /// Validate pre-built entries and construct the registry.
    ///
    /// Every schema invariant is enforced here, failing fast rather
    /// than deferring to first use.
    pub fn from_entries(mut entries: Vec<ChannelEntry>) -> Result<Self> {
        let mut names = HashSet::new();
        for entry in &entries {
            if !names.insert(entry.name.clone()) {
                return Err(SchemaError::DuplicateName(entry.name.clone()));
            }

            let range = entry.id_range;
            if range.low > range.high {
                return Err(SchemaError::InvertedRange {
                    channel: entry.name.clone(),
                    low: range.low,
                    high: range.high,
                });
            }

            let width = range.width();
            match entry.expand {
                Expansion::None => {
                    if width > 1 {
                        return Err(SchemaError::MissingExpansion(entry.name.clone()));
                    }
                }
                alphabet => {
                    if width == 1 {
                        return Err(SchemaError::UnexpectedExpansion(entry.name.clone()));
                    }
                    if width > alphabet.capacity() {
                        return Err(SchemaError::RangeTooWide {
                            channel: entry.name.clone(),
                            width,
                            alphabet,
                            capacity: alphabet.capacity(),
                        });
                    }
                }
            }

            if entry.dims.is_empty() {
                return Err(SchemaError::EmptyDims(entry.name.clone()));
            }
        }

        entries.sort_by_key(|e| e.id_range.low);
        for pair in entries.windows(2) {
            if pair[0].id_range.high >= pair[1].id_range.low {
                return Err(SchemaError::OverlappingRanges {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        debug!(channels = entries.len(), "channel registry loaded");
        Ok(Self { entries })
    }

    /// Find the entry owning a type ID.
    ///
    /// Binary search over sorted range starts: O(log n) in declared
    /// entries, not in IDs.
    pub fn lookup(&self, id: u16) -> Option<&ChannelEntry> {
        let idx = self.entries.partition_point(|e| e.id_range.low <= id);
        let entry = self.entries[..idx].last()?;
        (entry.id_range.high >= id).then_some(entry)
    }

    /// All entries, sorted by range start.
    pub fn entries(&self) -> &[ChannelEntry] {
        &self.entries
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{ChannelAttributes, TypeIdRange};

    fn entry(name: &str, low: u16, high: u16, expand: Expansion) -> ChannelEntry {
        ChannelEntry {
            name: name.to_string(),
            id_range: TypeIdRange::new(low, high),
            attributes: ChannelAttributes::default(),
            expand,
            dims: vec!["time".to_string()],
        }
    }

    #[test]
    fn test_lookup_single_and_range() {
        let registry = Registry::from_entries(vec![
            entry("time", 0x100, 0x100, Expansion::None),
            entry("A", 0x111, 0x113, Expansion::Letters),
        ])
        .unwrap();

        assert_eq!(registry.lookup(0x100).unwrap().name, "time");
        assert_eq!(registry.lookup(0x112).unwrap().name, "A");
        assert!(registry.lookup(0x101).is_none());
        assert!(registry.lookup(0x114).is_none());
        assert!(registry.lookup(0xFFFF).is_none());
    }

    #[test]
    fn test_rejects_overlapping_ranges() {
        let err = Registry::from_entries(vec![
            entry("A", 0x111, 0x113, Expansion::Letters),
            entry("B", 0x113, 0x114, Expansion::Letters),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::OverlappingRanges { .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Registry::from_entries(vec![
            entry("P", 0x110, 0x110, Expansion::None),
            entry("P", 0x120, 0x120, Expansion::None),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName(name) if name == "P"));
    }
}
