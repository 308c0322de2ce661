//! Sifter: apply named query scopes from shorthand filter specs.
//!
//! A filter spec may be a single scope name, a list of names (optionally with arguments),
//! or a mapping of names to argument lists. Sifter normalizes any of these into an ordered
//! list of scope invocations and folds them onto a base query, silently skipping scopes the
//! query type does not support.

extern crate self as sifter;

pub mod apply;
pub mod chain;
pub mod config;
pub mod errors;
pub mod filters;
pub mod registry;
pub mod scope;
pub mod search;

pub use apply::{FilterStep, SkipReason, StepOutcome, apply_filters, explain};
pub use chain::{ConfiguredQueryType, ScopeChain};
pub use config::{QueryTypeConfig, ScopeConfig, SifterConfig};
pub use errors::*;
pub use filters::{FilterEntry, FilterSpec, NormalizedFilter, normalize, normalize_value};
pub use registry::*;
pub use scope::{ScopeNames, ScopeSet, ScopeSource, Scoped};
pub use search::{FILTERS_KEY, SearchOptions, Sifter, search};
pub use sifter_macros::Scopes;

// Re-export inventory so the derive macro can submit registrations
pub use inventory;
