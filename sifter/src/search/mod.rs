//! # Search pipeline
//!
//! A search takes a query source and a bag of find-style options, pulls the `filters` entry
//! out of the bag, builds the base query from what is left, and folds the normalized
//! filters onto it.
//!
//! | Step | Who                         | What                                        |
//! |------|-----------------------------|---------------------------------------------|
//! | 1    | [`SearchOptions`]           | remove `filters`, keep everything else      |
//! | 2    | [`ScopeSource::scope_names`]| snapshot the supported scopes               |
//! | 3    | [`normalize_value`]         | raw spec into ordered scope invocations     |
//! | 4    | [`ScopeSource::base_query`] | build the unfiltered query                  |
//! | 5    | [`apply_filters`]           | left-to-right fold, unknown scopes skipped  |
//!
//! ## Example Usage
//!
//! ```
//! use serde_json::{Value, json};
//! use sifter::{ScopeSet, ScopeSource, Scoped, SearchOptions, SiftError, search};
//!
//! #[derive(Debug, Default)]
//! struct Sql(Vec<String>);
//!
//! impl Scoped for Sql {
//!     type Error = SiftError;
//!
//!     fn apply_scope(mut self, name: &str, args: &[Value]) -> Result<Self, Self::Error> {
//!         self.0.push(format!("{name}{args:?}"));
//!         Ok(self)
//!     }
//! }
//!
//! struct Articles;
//!
//! impl ScopeSource for Articles {
//!     type Query = Sql;
//!
//!     fn scope_names(&self) -> ScopeSet {
//!         ["published", "by_author"].into_iter().collect()
//!     }
//!
//!     fn base_query(&self, _options: SearchOptions) -> Result<Sql, SiftError> {
//!         Ok(Sql::default())
//!     }
//! }
//!
//! let options = SearchOptions::new()
//!     .with("limit", 10)
//!     .with("filters", json!(["published", { "by_author": ["Doe"] }, "archived"]));
//! let query = search(&Articles, options).unwrap();
//! assert_eq!(query.0, ["published[]", "by_author[String(\"Doe\")]"]);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::apply::{FilterStep, apply_filters, explain};
use crate::errors::InvalidFilterSpecError;
use crate::filters::{FilterSpec, NormalizedFilter, normalize_value};
use crate::scope::{ScopeSet, ScopeSource, Scoped};

/// Option key reserved for the filter spec.
pub const FILTERS_KEY: &str = "filters";

/// Find-style options for a search.
///
/// Apart from [`FILTERS_KEY`], keys and values are opaque here and passed through to
/// [`ScopeSource::base_query`] in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchOptions {
    entries: Map<String, Value>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set the filter spec from any typed shorthand.
    #[inline]
    pub fn with_filters(self, spec: impl Into<FilterSpec>) -> Self {
        self.with(FILTERS_KEY, Value::from(spec.into()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Remove and return the raw filter spec, `null` when none was given.
    pub fn take_filters(&mut self) -> Value {
        self.remove(FILTERS_KEY).unwrap_or(Value::Null)
    }

    /// Fill in keys the caller did not set. Caller values always win.
    pub fn merge_defaults(&mut self, defaults: &Map<String, Value>) {
        for (key, value) in defaults {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for SearchOptions {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SearchOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One search request against one query source.
///
/// Construction extracts and normalizes the filters and snapshots the supported scopes, so
/// a malformed spec fails before any query is built. [`Sifter::search`] consumes the
/// request.
pub struct Sifter<'a, S: ScopeSource> {
    source: &'a S,
    scopes: ScopeSet,
    filters: Vec<NormalizedFilter>,
    options: SearchOptions,
}

impl<'a, S: ScopeSource> Sifter<'a, S> {
    pub fn new(source: &'a S, mut options: SearchOptions) -> Result<Self, InvalidFilterSpecError> {
        let raw = options.take_filters();
        let scopes = source.scope_names();
        let filters = normalize_value(raw)?;
        debug!(
            "search prepared: {} filter(s), {} supported scope(s), {} option(s)",
            filters.len(),
            scopes.len(),
            options.len()
        );
        Ok(Self {
            source,
            scopes,
            filters,
            options,
        })
    }

    pub fn filters(&self) -> &[NormalizedFilter] {
        &self.filters
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// Options that will reach [`ScopeSource::base_query`].
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn explain(&self) -> Vec<FilterStep> {
        explain(&self.filters, &self.scopes)
    }

    /// Build the base query and fold the filters onto it.
    pub fn search(self) -> Result<S::Query, <S::Query as Scoped>::Error> {
        let Self {
            source,
            scopes,
            filters,
            options,
        } = self;
        let base = source.base_query(options)?;
        apply_filters(base, &filters, &scopes)
    }
}

/// Run a complete search.
///
/// Errors come back in the query's own error type: a malformed spec via its
/// `From<InvalidFilterSpecError>` conversion, scope failures exactly as the query raised them.
pub fn search<S>(source: &S, options: SearchOptions) -> Result<S::Query, <S::Query as Scoped>::Error>
where
    S: ScopeSource,
    <S::Query as Scoped>::Error: From<InvalidFilterSpecError>,
{
    Sifter::new(source, options)?.search()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SiftError;
    use serde_json::json;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct Trace {
        options: SearchOptions,
        calls: Vec<(String, Vec<Value>)>,
    }

    impl Scoped for Trace {
        type Error = SiftError;

        fn apply_scope(mut self, name: &str, args: &[Value]) -> Result<Self, Self::Error> {
            if name == "by_author" && args.len() != 1 {
                return Err(SiftError::ScopeArity {
                    scope: name.to_string(),
                    expected: 1,
                    actual: args.len(),
                });
            }
            self.calls.push((name.to_string(), args.to_vec()));
            Ok(self)
        }
    }

    struct Posts {
        scopes: &'static [&'static str],
        base_queries: Cell<usize>,
    }

    impl Posts {
        fn new(scopes: &'static [&'static str]) -> Self {
            Self {
                scopes,
                base_queries: Cell::new(0),
            }
        }
    }

    impl ScopeSource for Posts {
        type Query = Trace;

        fn scope_names(&self) -> ScopeSet {
            self.scopes.iter().copied().collect()
        }

        fn base_query(&self, options: SearchOptions) -> Result<Trace, SiftError> {
            self.base_queries.set(self.base_queries.get() + 1);
            Ok(Trace {
                options,
                calls: Vec::new(),
            })
        }
    }

    fn call_names(trace: &Trace) -> Vec<&str> {
        trace.calls.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn filters_are_removed_before_base_query() {
        let posts = Posts::new(&["active"]);
        let options = SearchOptions::new()
            .with("order", "created_at desc")
            .with_filters("active")
            .with("limit", 5);
        let trace = search(&posts, options).unwrap();

        assert!(trace.options.get(FILTERS_KEY).is_none());
        let keys: Vec<&String> = trace.options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["order", "limit"]);
        assert_eq!(call_names(&trace), ["active"]);
    }

    #[test]
    fn missing_filters_yields_the_base_query() {
        let posts = Posts::new(&["active"]);
        let trace = search(&posts, SearchOptions::new().with("limit", 1)).unwrap();
        assert!(trace.calls.is_empty());
        assert_eq!(trace.options.get("limit"), Some(&json!(1)));
    }

    #[test]
    fn mapping_spec_applies_known_scopes_in_key_order() {
        let posts = Posts::new(&["active", "featured"]);
        let options = SearchOptions::new().with("filters", json!({ "active": [], "featured": [], "hidden": ["x"] }));
        let trace = search(&posts, options).unwrap();
        assert_eq!(call_names(&trace), ["active", "featured"]);
    }

    #[test]
    fn invalid_spec_fails_before_building_a_query() {
        let posts = Posts::new(&["active"]);
        let err = search(&posts, SearchOptions::new().with("filters", 42)).expect_err("integer spec should fail");
        assert!(matches!(err, SiftError::InvalidFilterSpec(ref inner) if inner.value == json!(42)));
        assert_eq!(posts.base_queries.get(), 0);

        let err = Sifter::new(&posts, SearchOptions::new().with("filters", json!([["Doe"]])))
            .err()
            .expect("bare argument list should fail");
        assert_eq!(err.value, json!(["Doe"]));
    }

    #[test]
    fn scope_errors_reach_the_caller_unwrapped() {
        let posts = Posts::new(&["by_author"]);
        let options = SearchOptions::new().with_filters(FilterSpec::mapping([("by_author", vec![json!("a"), json!("b")])]));
        let err = search(&posts, options).expect_err("arity mismatch should fail");
        assert!(matches!(
            err,
            SiftError::ScopeArity {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn sifter_exposes_prepared_state() {
        let posts = Posts::new(&["published"]);
        let options = SearchOptions::new()
            .with("select", "id")
            .with("filters", json!(["published", { "by_author": ["Doe"] }]));
        let sifter = Sifter::new(&posts, options).unwrap();

        assert_eq!(sifter.filters().len(), 2);
        assert!(sifter.scopes().supports("published"));
        assert!(sifter.options().get(FILTERS_KEY).is_none());

        let steps = sifter.explain();
        assert_eq!(steps[0].outcome, crate::apply::StepOutcome::Applied);
        assert_eq!(
            steps[1].outcome,
            crate::apply::StepOutcome::Skipped(crate::apply::SkipReason::Unsupported)
        );

        let trace = sifter.search().unwrap();
        assert_eq!(call_names(&trace), ["published"]);
        assert_eq!(posts.base_queries.get(), 1);
    }

    #[test]
    fn merge_defaults_keeps_caller_values() {
        let mut options = SearchOptions::new().with("limit", 5);
        let defaults = json!({ "limit": 25, "order": "id" });
        options.merge_defaults(defaults.as_object().unwrap());
        assert_eq!(options.get("limit"), Some(&json!(5)));
        assert_eq!(options.get("order"), Some(&json!("id")));
    }

    #[test]
    fn options_deserialize_from_object() {
        let options: SearchOptions = serde_json::from_str(r#"{"filters": "active", "limit": 3}"#).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.get(FILTERS_KEY), Some(&json!("active")));
    }
}
