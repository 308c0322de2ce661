//! Seams between the sifter and the query types it drives.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::search::SearchOptions;

/// A query that can have named scopes applied to it.
///
/// The query is moved through each call, so every step consumes exactly the value the
/// previous step produced. Errors are the implementor's own and reach the caller of
/// [`search`](crate::search::search) untouched.
pub trait Scoped: Sized {
    type Error;

    /// Apply one scope with its ordered arguments.
    fn apply_scope(self, name: &str, args: &[Value]) -> Result<Self, Self::Error>;
}

/// Describes a query type: which scopes it supports and how to build its base query.
pub trait ScopeSource {
    type Query: Scoped;

    /// Names of every scope this query type can apply.
    fn scope_names(&self) -> ScopeSet;

    /// Build the unfiltered query from the caller's options (minus `filters`).
    fn base_query(&self, options: SearchOptions) -> Result<Self::Query, <Self::Query as Scoped>::Error>;
}

/// Statically enumerable scope names, usually produced by `#[derive(Scopes)]`.
pub trait ScopeNames: Sized + 'static {
    const SCOPES: &'static [&'static str];

    fn from_scope_name(name: &str) -> Option<Self>;

    fn scope_name(&self) -> &'static str;
}

/// The scopes a query type supports, fixed for the duration of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScopeSet {
    names: BTreeSet<String>,
}

impl ScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every scope declared by a [`ScopeNames`] type.
    pub fn of<E: ScopeNames>() -> Self {
        E::SCOPES.iter().copied().collect()
    }

    /// Whether `name` may be applied. The empty name is never supported, even when it has
    /// been inserted.
    #[inline]
    pub fn supports(&self, name: &str) -> bool {
        !name.is_empty() && self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ScopeSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}
