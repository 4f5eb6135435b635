//! Channel schema entries and the declarative document format.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::expand::Expansion;

/// An inclusive range of type IDs owned by one channel entry.
///
/// Most channels claim a single ID (`low == high`); templated channels
/// (multi-axis sensors, probe arrays) claim a contiguous block that the
/// expansion engine fans out into individually named variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeIdRange {
    pub low: u16,
    pub high: u16,
}

impl TypeIdRange {
    /// Range covering a single ID.
    pub fn single(id: u16) -> Self {
        Self { low: id, high: id }
    }

    /// Range covering `low..=high`. Bound order is validated by
    /// `Registry::from_entries`, not here.
    pub fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Number of IDs covered.
    pub fn width(&self) -> usize {
        usize::from(self.high.saturating_sub(self.low)) + 1
    }

    pub fn is_single(&self) -> bool {
        self.low == self.high
    }

    pub fn contains(&self, id: u16) -> bool {
        id >= self.low && id <= self.high
    }
}

/// Orientation hint for vertical coordinate variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Up,
    Down,
}

/// CF-convention metadata attached to one output variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAttributes {
    /// CF standard name; empty when the channel has no entry in the
    /// standard vocabulary.
    #[serde(default)]
    pub standard_name: String,

    /// Human-readable name.
    #[serde(default)]
    pub long_name: String,

    /// Unit string (e.g. "m s-2", "seconds since 1970-01-01").
    #[serde(default)]
    pub units: String,

    /// Orientation hint for vertical coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<Orientation>,
}

/// One declared instrument channel, immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEntry {
    /// Unique key across the whole registry.
    pub name: String,

    /// The ID or contiguous ID block this channel owns.
    pub id_range: TypeIdRange,

    /// CF metadata copied onto every variable the entry produces.
    pub attributes: ChannelAttributes,

    /// How a multi-ID range fans out into named variables.
    pub expand: Expansion,

    /// Ordered dimension names, never empty.
    pub dims: Vec<String>,
}

impl ChannelEntry {
    /// A coordinate variable's dimensions include its own name; it is
    /// an axis, not a data channel.
    pub fn is_coordinate(&self) -> bool {
        self.dims.iter().any(|d| d == &self.name)
    }
}

// ============================================================================
// Declarative document format
// ============================================================================

/// `dims: time` and `dims: [time, freq]` are both accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(dims: OneOrMany) -> Self {
        match dims {
            OneOrMany::One(dim) => vec![dim],
            OneOrMany::Many(dims) => dims,
        }
    }
}

/// A type ID bound: plain integer or `"0x…"` hex string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn to_id(&self, channel: &str) -> Result<u16, SchemaError> {
        let value = match self {
            RawId::Number(n) => *n,
            RawId::Text(s) => {
                let trimmed = s.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => trimmed.parse(),
                };
                parsed.map_err(|_| SchemaError::InvalidTypeId {
                    channel: channel.to_string(),
                    value: s.clone(),
                })?
            }
        };
        u16::try_from(value).map_err(|_| SchemaError::TypeIdOutOfRange {
            channel: channel.to_string(),
            value,
        })
    }
}

/// A type ID declaration: single bound or `[low, high]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawIdRange {
    Single(RawId),
    Bounds(Vec<RawId>),
}

impl RawIdRange {
    fn to_range(&self, channel: &str) -> Result<TypeIdRange, SchemaError> {
        match self {
            RawIdRange::Single(id) => Ok(TypeIdRange::single(id.to_id(channel)?)),
            RawIdRange::Bounds(bounds) => match bounds.as_slice() {
                [only] => Ok(TypeIdRange::single(only.to_id(channel)?)),
                [low, high] => Ok(TypeIdRange::new(low.to_id(channel)?, high.to_id(channel)?)),
                _ => Err(SchemaError::BadBoundCount {
                    channel: channel.to_string(),
                    count: bounds.len(),
                }),
            },
        }
    }
}

/// One channel as it appears in the schema document, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawChannel {
    #[serde(alias = "typeID")]
    pub type_id: RawIdRange,

    #[serde(default)]
    pub standard_name: String,

    #[serde(default)]
    pub long_name: String,

    #[serde(default)]
    pub units: String,

    #[serde(default)]
    pub positive: Option<Orientation>,

    #[serde(default)]
    pub expand: Option<Expansion>,

    pub dims: OneOrMany,
}

impl RawChannel {
    pub(crate) fn into_entry(self, name: &str) -> Result<ChannelEntry, SchemaError> {
        let id_range = self.type_id.to_range(name)?;
        Ok(ChannelEntry {
            name: name.to_string(),
            id_range,
            attributes: ChannelAttributes {
                standard_name: self.standard_name,
                long_name: self.long_name,
                units: self.units,
                positive: self.positive,
            },
            expand: self.expand.unwrap_or(Expansion::None),
            dims: self.dims.into(),
        })
    }
}

/// The schema document: a map from channel name to declaration.
///
/// Deserialized through a hand-written visitor so a repeated name
/// reaches registry validation as a duplicate instead of silently
/// keeping whichever entry came last.
#[derive(Debug)]
pub(crate) struct SchemaDoc(pub(crate) Vec<(String, RawChannel)>);

impl<'de> Deserialize<'de> for SchemaDoc {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DocVisitor;

        impl<'de> serde::de::Visitor<'de> for DocVisitor {
            type Value = SchemaDoc;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of channel name to channel declaration")
            }

            fn visit_map<A>(self, mut map: A) -> Result<SchemaDoc, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, RawChannel>()? {
                    entries.push(pair);
                }
                Ok(SchemaDoc(entries))
            }
        }

        deserializer.deserialize_map(DocVisitor)
    }
}
