//! Assembled variable series and shared dimension axes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use channel_schema::ChannelAttributes;
use serde::Serialize;

/// Shared coordinate sequence for one dimension.
///
/// Owned by the session while open; frozen behind `Arc` at finish so
/// every variable on the dimension references one axis instead of
/// carrying a copy.
#[derive(Debug, Default)]
pub struct DimensionAxis {
    values: Vec<f64>,
    /// Bit-pattern index for O(1) point lookup on repeating axes
    /// (e.g. `freq` cycling once per spectrum).
    positions: HashMap<u64, usize>,
}

impl DimensionAxis {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Index of an existing axis point, matched on the exact bit
    /// pattern so NaN sentinels behave.
    pub(crate) fn position(&self, coordinate: f64) -> Option<usize> {
        self.positions.get(&coordinate.to_bits()).copied()
    }

    /// Append a new axis point, returning its index.
    pub(crate) fn push(&mut self, coordinate: f64) -> usize {
        let index = self.values.len();
        self.positions.entry(coordinate.to_bits()).or_insert(index);
        self.values.push(coordinate);
        index
    }

    pub(crate) fn into_shared(self) -> Arc<Vec<f64>> {
        Arc::new(self.values)
    }
}

/// Accumulated output for one resolved variable, as handed to the
/// external metadata writer.
#[derive(Debug, Serialize)]
pub struct VariableSeries {
    /// CF metadata (standard_name / long_name / units / positive).
    pub attributes: ChannelAttributes,

    /// Ordered dimension names.
    pub dims: Vec<String>,

    /// Sample values in input order.
    pub values: Vec<f64>,

    /// One shared axis per dimension, referenced rather than copied.
    pub coordinates: BTreeMap<String, Arc<Vec<f64>>>,
}

impl VariableSeries {
    /// Number of accumulated samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
