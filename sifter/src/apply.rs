//! Folding normalized filters onto a query.
//!
//! Unknown scope names are skipped rather than rejected: a caller may send the same filter
//! set to several query types, and each applies only the scopes it knows.

use log::debug;
use serde::Serialize;

use crate::filters::NormalizedFilter;
use crate::scope::{ScopeSet, Scoped};

/// Why a filter was left out of the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyName,
    Unsupported,
}

impl SkipReason {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SkipReason::EmptyName => "empty name",
            SkipReason::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum StepOutcome {
    Applied,
    Skipped(SkipReason),
}

/// What happens to one filter when folded against a given scope set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStep {
    pub filter: NormalizedFilter,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Decide whether a filter would be applied against `supported`.
pub fn check(filter: &NormalizedFilter, supported: &ScopeSet) -> StepOutcome {
    if filter.is_unnamed() {
        StepOutcome::Skipped(SkipReason::EmptyName)
    } else if !supported.supports(&filter.name) {
        StepOutcome::Skipped(SkipReason::Unsupported)
    } else {
        StepOutcome::Applied
    }
}

/// Apply `filters` to `query` left to right, skipping unsupported or unnamed scopes.
///
/// The first error from [`Scoped::apply_scope`] stops the fold and is returned as is.
pub fn apply_filters<Q: Scoped>(query: Q, filters: &[NormalizedFilter], supported: &ScopeSet) -> Result<Q, Q::Error> {
    filters
        .iter()
        .try_fold(query, |query, filter| apply_step(query, filter, supported))
}

fn apply_step<Q: Scoped>(query: Q, filter: &NormalizedFilter, supported: &ScopeSet) -> Result<Q, Q::Error> {
    match check(filter, supported) {
        StepOutcome::Applied => {
            debug!("applying scope '{}' with {} argument(s)", filter.name, filter.args.len());
            query.apply_scope(&filter.name, &filter.args)
        }
        StepOutcome::Skipped(reason) => {
            debug!("skipping scope '{}': {}", filter.name, reason.as_str());
            Ok(query)
        }
    }
}

/// Report the outcome of every filter without touching a query.
pub fn explain(filters: &[NormalizedFilter], supported: &ScopeSet) -> Vec<FilterStep> {
    filters
        .iter()
        .map(|filter| FilterStep {
            filter: filter.clone(),
            outcome: check(filter, supported),
        })
        .collect()
}
