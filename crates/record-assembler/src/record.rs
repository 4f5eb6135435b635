//! Decoded telemetry records as delivered by the external decoder.

use serde::{Deserialize, Deserializer};

/// One decoded telemetry sample.
///
/// `coordinates` match the owning entry's dimensions positionally. A
/// coordinate variable (a channel that is its own axis, like `time`)
/// may omit them; its value doubles as the coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Raw channel type ID. Accepts integers or `"0x…"` hex strings.
    #[serde(deserialize_with = "deserialize_type_id")]
    pub type_id: u16,

    /// Per-dimension coordinate values, in the entry's `dims` order.
    #[serde(default)]
    pub coordinates: Vec<f64>,

    /// Sample value. The wire format spells non-finite values as the
    /// string `"NaN"`, so both forms are accepted.
    #[serde(deserialize_with = "deserialize_value")]
    pub value: f64,
}

impl Record {
    pub fn new(type_id: u16, coordinates: Vec<f64>, value: f64) -> Self {
        Self {
            type_id,
            coordinates,
            value,
        }
    }
}

fn deserialize_type_id<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => {
            let trimmed = s.trim();
            let parsed = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => trimmed.parse(),
            };
            parsed.map_err(|_| serde::de::Error::custom(format!("invalid type ID '{s}'")))?
        }
    };
    u16::try_from(value)
        .map_err(|_| serde::de::Error::custom(format!("type ID {value} exceeds 0xFFFF")))
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid value '{s}'"))),
    }
}
