//! Assembly sessions: the `Open → Closed` state machine that turns a
//! record stream into an assembled dataset.

use std::collections::{BTreeMap, BTreeSet};
use std::mem;
use std::sync::Arc;

use channel_schema::{Registry, ResolveError, ResolvedVariable, Resolver};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::AssemblyError;
use crate::record::Record;
use crate::series::{DimensionAxis, VariableSeries};

/// Assembly policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Fail the session on the first unknown type ID instead of
    /// counting and skipping. For operators who want assurance that no
    /// data was silently dropped.
    pub strict: bool,
}

/// Outcome of processing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// The record's type ID had no schema entry; it was counted for
    /// the end-of-session report, not stored.
    Skipped { type_id: u16 },
}

/// Diagnostic summary of records whose type ID had no schema entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnknownIdSummary {
    /// Total records skipped.
    pub skipped_records: u64,

    /// Distinct unrecognized IDs, reported so operators can extend the
    /// schema.
    #[serde(serialize_with = "serialize_hex_ids")]
    pub distinct_ids: BTreeSet<u16>,
}

impl UnknownIdSummary {
    fn count(&mut self, type_id: u16) {
        self.skipped_records += 1;
        self.distinct_ids.insert(type_id);
    }

    pub fn is_empty(&self) -> bool {
        self.skipped_records == 0
    }

    /// IDs rendered as `0x….` strings for logs and reports.
    pub fn hex_ids(&self) -> Vec<String> {
        self.distinct_ids
            .iter()
            .map(|id| format!("0x{id:04X}"))
            .collect()
    }
}

fn serialize_hex_ids<S>(ids: &BTreeSet<u16>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(ids.iter().map(|id| format!("0x{id:04X}")))
}

/// The frozen output of a session, in the shape the external metadata
/// writer consumes.
#[derive(Debug, Serialize)]
pub struct AssembledDataset {
    /// Provenance stamp for the writer's CF `history` attribute.
    pub created: DateTime<Utc>,

    /// Variable name → series, including coordinate variables.
    pub variables: BTreeMap<String, VariableSeries>,

    /// End-of-session unknown-ID report.
    pub unknown_ids: UnknownIdSummary,
}

struct SeriesState {
    resolved: Arc<ResolvedVariable>,
    values: Vec<f64>,
}

struct OpenState {
    resolver: Resolver,
    series: BTreeMap<String, SeriesState>,
    axes: BTreeMap<String, DimensionAxis>,
    unknown: UnknownIdSummary,
}

enum State {
    Open(OpenState),
    Closed(AssembledDataset),
}

/// One assembly session over a single, sequential record stream.
///
/// Sessions move `Open → Closed` exactly once; there is no rollback.
/// An accepted record's effect is permanent for the session.
pub struct Session {
    config: SessionConfig,
    state: State,
}

impl Session {
    pub fn new(registry: Arc<Registry>, config: SessionConfig) -> Self {
        Self {
            config,
            state: State::Open(OpenState {
                resolver: Resolver::new(registry),
                series: BTreeMap::new(),
                axes: BTreeMap::new(),
                unknown: UnknownIdSummary::default(),
            }),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    /// Route one record into its variable series.
    ///
    /// A rejected record leaves no partial write behind: every axis
    /// update is planned before any state is touched.
    pub fn process(&mut self, record: &Record) -> Result<Outcome, AssemblyError> {
        let strict = self.config.strict;
        let open = match &mut self.state {
            State::Open(open) => open,
            State::Closed(_) => return Err(AssemblyError::SessionClosed),
        };

        let resolved = match open.resolver.resolve(record.type_id) {
            Ok(resolved) => resolved,
            Err(ResolveError::UnknownId(type_id)) => {
                if strict {
                    return Err(AssemblyError::UnknownId(type_id));
                }
                open.unknown.count(type_id);
                debug!(type_id = %format!("0x{type_id:04X}"), "no schema entry, skipping record");
                return Ok(Outcome::Skipped { type_id });
            }
            Err(err @ ResolveError::ExpansionRange { .. }) => {
                return Err(AssemblyError::Invariant(err));
            }
        };

        // A coordinate variable's own value is its coordinate; the
        // feed may omit the redundant copy.
        let coordinates: &[f64] = if record.coordinates.is_empty()
            && resolved.dims.len() == 1
            && resolved.is_coordinate()
        {
            std::slice::from_ref(&record.value)
        } else {
            &record.coordinates
        };

        if coordinates.len() != resolved.dims.len() {
            return Err(AssemblyError::DimensionArity {
                variable: resolved.variable_name.clone(),
                dims: resolved.dims.clone(),
                expected: resolved.dims.len(),
                got: coordinates.len(),
            });
        }

        let length = open
            .series
            .get(&resolved.variable_name)
            .map_or(0, |s| s.values.len());

        let mut extends: Vec<(&str, f64)> = Vec::new();
        for (dim, &coordinate) in resolved.dims.iter().zip(coordinates) {
            let axis = open.axes.get(dim.as_str());
            if resolved.dims.len() == 1 {
                // Aligned append: value i pairs with axis point i. A
                // sibling variable may already have registered the
                // point; then the two must agree.
                match axis.and_then(|a| a.get(length)) {
                    Some(existing) if existing.to_bits() == coordinate.to_bits() => {}
                    Some(existing) => {
                        return Err(AssemblyError::CoordinateMismatch {
                            dim: dim.clone(),
                            index: length,
                            existing,
                            got: coordinate,
                        });
                    }
                    None => extends.push((dim.as_str(), coordinate)),
                }
            } else if axis.and_then(|a| a.position(coordinate)).is_none() {
                // Multi-dimensional variables share existing axis
                // points or extend the axis.
                extends.push((dim.as_str(), coordinate));
            }
        }

        for (dim, coordinate) in extends {
            open.axes.entry(dim.to_string()).or_default().push(coordinate);
        }
        open.series
            .entry(resolved.variable_name.clone())
            .or_insert_with(|| SeriesState {
                resolved: Arc::clone(&resolved),
                values: Vec::new(),
            })
            .values
            .push(record.value);

        Ok(Outcome::Accepted)
    }

    /// Close the session and return the frozen dataset.
    ///
    /// Idempotent: repeated calls return the same result.
    pub fn finish(&mut self) -> &AssembledDataset {
        if let State::Open(_) = self.state {
            let state = mem::replace(
                &mut self.state,
                State::Closed(AssembledDataset {
                    created: Utc::now(),
                    variables: BTreeMap::new(),
                    unknown_ids: UnknownIdSummary::default(),
                }),
            );
            if let State::Open(open) = state {
                self.state = State::Closed(open.into_dataset());
            }
        }

        match &self.state {
            State::Closed(dataset) => dataset,
            State::Open(_) => unreachable!("closed above"),
        }
    }
}

impl OpenState {
    fn into_dataset(self) -> AssembledDataset {
        let axes: BTreeMap<String, Arc<Vec<f64>>> = self
            .axes
            .into_iter()
            .map(|(dim, axis)| (dim, axis.into_shared()))
            .collect();

        let mut variables = BTreeMap::new();
        for (name, series) in self.series {
            let coordinates: BTreeMap<String, Arc<Vec<f64>>> = series
                .resolved
                .dims
                .iter()
                .filter_map(|dim| axes.get(dim).map(|axis| (dim.clone(), Arc::clone(axis))))
                .collect();

            // Advisory shape check: a variable that missed part of an
            // axis still ships, flagged for the writer's attention.
            if let [dim] = series.resolved.dims.as_slice() {
                if let Some(axis) = coordinates.get(dim) {
                    if axis.len() != series.values.len() {
                        warn!(
                            variable = %name,
                            dim = %dim,
                            axis_len = axis.len(),
                            values = series.values.len(),
                            "variable length disagrees with its dimension axis"
                        );
                    }
                }
            }

            variables.insert(
                name,
                VariableSeries {
                    attributes: series.resolved.attributes.clone(),
                    dims: series.resolved.dims.clone(),
                    values: series.values,
                    coordinates,
                },
            );
        }

        if !self.unknown.is_empty() {
            warn!(
                skipped = self.unknown.skipped_records,
                ids = ?self.unknown.hex_ids(),
                "records with unknown type IDs were skipped"
            );
        }
        info!(variables = variables.len(), "assembly session closed");

        AssembledDataset {
            created: Utc::now(),
            variables,
            unknown_ids: self.unknown,
        }
    }
}
