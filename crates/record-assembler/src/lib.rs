//! Sequential assembly of decoded telemetry records into CF-style
//! variable series.
//!
//! A [`Session`] consumes `(type_id, coordinates, value)` records in
//! input order, routes each through the channel-schema resolver, and
//! accumulates per-variable value series plus shared dimension axes.
//! [`Session::finish`] freezes the session into an
//! [`AssembledDataset`], the handoff document for the external
//! metadata writer.
//!
//! One session is single-threaded by design: coordinate sharing across
//! variables is order-sensitive. Independent sessions may run in
//! parallel over one `Arc<Registry>`.

pub mod error;
pub mod record;
pub mod series;
pub mod session;

// Re-exports
pub use error::{AssemblyError, Result};
pub use record::Record;
pub use series::{DimensionAxis, VariableSeries};
pub use session::{AssembledDataset, Outcome, Session, SessionConfig, UnknownIdSummary};
