//! Flattening of raw filter specs into an ordered list of scope invocations.

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::InvalidFilterSpecError;
use crate::filters::spec::{FilterEntry, FilterSpec};

/// A single scope invocation: the scope name plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFilter {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl NormalizedFilter {
    #[inline]
    pub fn new(name: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// A scope invocation with no arguments.
    #[inline]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Empty names are never a valid scope.
    #[inline]
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}

impl From<FilterEntry> for NormalizedFilter {
    fn from(entry: FilterEntry) -> Self {
        match entry {
            FilterEntry::Name(name) => Self::bare(name),
            FilterEntry::Scoped { name, args } => Self { name, args },
        }
    }
}

/// Normalize a typed spec. Output order is application order; nothing is deduplicated.
pub fn normalize(spec: FilterSpec) -> Vec<NormalizedFilter> {
    let filters: Vec<NormalizedFilter> = match spec {
        FilterSpec::Absent => Vec::new(),
        FilterSpec::Name(name) => vec![NormalizedFilter::bare(name)],
        FilterSpec::Sequence(entries) => entries.into_iter().map(NormalizedFilter::from).collect(),
        FilterSpec::Mapping(pairs) => pairs
            .into_iter()
            .map(|(name, args)| NormalizedFilter { name, args })
            .collect(),
    };
    trace!("normalized {} filter(s): {:?}", filters.len(), filters);
    filters
}

/// Normalize a dynamically-typed spec, rejecting shapes that do not name a scope.
pub fn normalize_value(raw: Value) -> Result<Vec<NormalizedFilter>, InvalidFilterSpecError> {
    FilterSpec::try_from(raw).map(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(filters: &[NormalizedFilter]) -> Vec<&str> {
        filters.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn absent_normalizes_to_nothing() {
        assert!(normalize(FilterSpec::Absent).is_empty());
        assert!(normalize_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn single_name_has_no_arguments() {
        let filters = normalize_value(json!("active")).unwrap();
        assert_eq!(filters, vec![NormalizedFilter::bare("active")]);
    }

    #[test]
    fn mixed_sequence_keeps_input_order() {
        let filters = normalize_value(json!(["published", { "by_author": ["Doe"] }])).unwrap();
        assert_eq!(
            filters,
            vec![
                NormalizedFilter::bare("published"),
                NormalizedFilter::new("by_author", [json!("Doe")]),
            ]
        );
    }

    #[test]
    fn mapping_matches_equivalent_sequence() {
        let from_mapping = normalize_value(json!({ "a": [1, 2], "b": [], "c": ["x"] })).unwrap();
        let from_sequence = normalize_value(json!([{ "a": [1, 2] }, { "b": [] }, { "c": ["x"] }])).unwrap();
        assert_eq!(from_mapping, from_sequence);
        assert_eq!(names(&from_mapping), ["a", "b", "c"]);
    }

    #[test]
    fn repeated_names_are_kept() {
        let filters = normalize_value(json!([{ "tagged": ["rust"] }, "active", { "tagged": ["async"] }])).unwrap();
        assert_eq!(names(&filters), ["tagged", "active", "tagged"]);
        assert_eq!(filters[0].args, vec![json!("rust")]);
        assert_eq!(filters[2].args, vec![json!("async")]);
    }

    #[test]
    fn empty_name_survives_normalization_as_unnamed() {
        let filters = normalize_value(json!({ "": ["x"] })).unwrap();
        assert_eq!(filters.len(), 1);
        assert!(filters[0].is_unnamed());
        assert_eq!(filters[0].args, vec![json!("x")]);
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        let err = normalize_value(json!(12)).expect_err("integer spec should fail");
        assert_eq!(err.value, json!(12));

        let err = normalize_value(json!([["Doe", "Smith"]])).expect_err("unwrapped arguments should fail");
        assert_eq!(err.value, json!(["Doe", "Smith"]));
    }

    #[test]
    fn serializes_with_args_field() {
        let value = serde_json::to_value(NormalizedFilter::new("by_author", [json!("Doe")])).unwrap();
        assert_eq!(value, json!({ "name": "by_author", "args": ["Doe"] }));

        let parsed: NormalizedFilter = serde_json::from_value(json!({ "name": "active" })).unwrap();
        assert_eq!(parsed, NormalizedFilter::bare("active"));
    }
}
