//! Memoized type-ID resolution against an immutable registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entry::{ChannelAttributes, ChannelEntry};
use crate::error::ResolveError;
use crate::expand::{self, Expansion};
use crate::registry::Registry;

/// The runtime materialization of one (entry, type ID) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    /// The entry name, suffixed when the entry is templated.
    pub variable_name: String,

    /// CF metadata copied from the entry; expansion only appends an
    /// index hint to `long_name`.
    pub attributes: ChannelAttributes,

    /// Ordered dimension names copied from the entry.
    pub dims: Vec<String>,
}

impl ResolvedVariable {
    fn from_entry(entry: &ChannelEntry) -> Self {
        Self {
            variable_name: entry.name.clone(),
            attributes: entry.attributes.clone(),
            dims: entry.dims.clone(),
        }
    }

    /// A coordinate variable's dimensions include its own name.
    pub fn is_coordinate(&self) -> bool {
        self.dims.iter().any(|d| d == &self.variable_name)
    }
}

/// Resolves raw type IDs to output variables.
///
/// Resolution is a pure function of `(registry, type_id)` and records
/// for one hardware channel recur at high frequency, so results are
/// memoized behind `Arc` for the resolver's lifetime.
#[derive(Debug)]
pub struct Resolver {
    registry: Arc<Registry>,
    cache: HashMap<u16, Arc<ResolvedVariable>>,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            cache: HashMap::new(),
        }
    }

    /// Resolve a type ID to its output variable.
    ///
    /// Unknown IDs come back as errors, never silenced; the caller owns
    /// the skip-vs-abort policy.
    pub fn resolve(&mut self, type_id: u16) -> Result<Arc<ResolvedVariable>, ResolveError> {
        if let Some(hit) = self.cache.get(&type_id) {
            return Ok(Arc::clone(hit));
        }

        let entry = self
            .registry
            .lookup(type_id)
            .ok_or(ResolveError::UnknownId(type_id))?;

        let resolved = match entry.expand {
            Expansion::None => ResolvedVariable::from_entry(entry),
            _ => expand::expand(entry, type_id - entry.id_range.low)?,
        };

        let resolved = Arc::new(resolved);
        self.cache.insert(type_id, Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Registry this resolver reads from.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}
