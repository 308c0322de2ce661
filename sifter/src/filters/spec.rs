//! Raw filter specifications as callers write them.
//!
//! A spec arrives in one of a few shorthand shapes. Dynamic input (JSON bodies, CLI
//! arguments, config values) is classified exactly once, in `TryFrom<Value>`; everything
//! downstream works on the [`FilterSpec`] variants.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::InvalidFilterSpecError;

/// Caller-supplied description of which scopes to apply.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sifter::filters::{FilterEntry, FilterSpec};
///
/// let single = FilterSpec::from("active");
/// assert_eq!(single, FilterSpec::Name("active".to_string()));
///
/// let mixed = FilterSpec::try_from(json!(["published", { "by_author": ["Doe"] }])).unwrap();
/// assert_eq!(
///     mixed,
///     FilterSpec::Sequence(vec![
///         FilterEntry::name("published"),
///         FilterEntry::scoped("by_author", [json!("Doe")]),
///     ])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FilterSpec {
    /// No filters requested.
    #[default]
    Absent,
    /// One scope, no arguments.
    Name(String),
    /// Ordered list of entries, each a bare name or a name with arguments.
    Sequence(Vec<FilterEntry>),
    /// Ordered name to argument-list pairs. Order is application order.
    Mapping(Vec<(String, Vec<Value>)>),
}

/// One element of a [`FilterSpec::Sequence`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    Name(String),
    Scoped { name: String, args: Vec<Value> },
}

impl FilterEntry {
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[inline]
    pub fn scoped(name: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        Self::Scoped {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Classify one element of a sequence-shaped spec.
    ///
    /// A string is a bare name. An object contributes one entry per key, in key order,
    /// so `{"a": [1]}` is the usual single-entry form. Anything else, including an empty
    /// object or an argument list with no name, is rejected.
    fn from_value(value: Value) -> Result<Vec<Self>, InvalidFilterSpecError> {
        match value {
            Value::String(name) => Ok(vec![Self::Name(name)]),
            Value::Object(map) if !map.is_empty() => Ok(map
                .into_iter()
                .map(|(name, args)| Self::Scoped {
                    name,
                    args: splat_args(args),
                })
                .collect()),
            other => Err(InvalidFilterSpecError::new(other)),
        }
    }
}

impl FilterSpec {
    /// Build a mapping-shaped spec from ordered `(name, args)` pairs.
    pub fn mapping<K, I>(pairs: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = Value>,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(name, args)| (name.into(), args.into_iter().collect()))
                .collect(),
        )
    }

    #[inline]
    pub fn sequence(entries: impl IntoIterator<Item = FilterEntry>) -> Self {
        Self::Sequence(entries.into_iter().collect())
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Turn a mapping value into an argument list.
///
/// An array is the list itself, `null` means no arguments, and any other value is a
/// single argument.
pub(crate) fn splat_args(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

impl TryFrom<Value> for FilterSpec {
    type Error = InvalidFilterSpecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Absent),
            Value::String(name) => Ok(Self::Name(name)),
            Value::Array(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    entries.extend(FilterEntry::from_value(item)?);
                }
                Ok(Self::Sequence(entries))
            }
            Value::Object(map) => Ok(Self::Mapping(
                map.into_iter().map(|(name, args)| (name, splat_args(args))).collect(),
            )),
            other => Err(InvalidFilterSpecError::new(other)),
        }
    }
}

impl From<FilterEntry> for Value {
    fn from(entry: FilterEntry) -> Self {
        match entry {
            FilterEntry::Name(name) => Value::String(name),
            FilterEntry::Scoped { name, args } => single_entry_object(name, args),
        }
    }
}

impl From<FilterSpec> for Value {
    fn from(spec: FilterSpec) -> Self {
        match spec {
            FilterSpec::Absent => Value::Null,
            FilterSpec::Name(name) => Value::String(name),
            FilterSpec::Sequence(entries) => Value::Array(entries.into_iter().map(Value::from).collect()),
            FilterSpec::Mapping(pairs) => {
                let mut seen = std::collections::HashSet::with_capacity(pairs.len());
                if pairs.iter().all(|(name, _)| seen.insert(name.as_str())) {
                    let map: Map<String, Value> = pairs
                        .into_iter()
                        .map(|(name, args)| (name, Value::Array(args)))
                        .collect();
                    Value::Object(map)
                } else {
                    // Repeated names cannot share one object; keep them apart and in order.
                    Value::Array(
                        pairs
                            .into_iter()
                            .map(|(name, args)| single_entry_object(name, args))
                            .collect(),
                    )
                }
            }
        }
    }
}

fn single_entry_object(name: String, args: Vec<Value>) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(name, Value::Array(args));
    Value::Object(map)
}

impl From<&str> for FilterSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<&str>> for FilterSpec {
    fn from(names: Vec<&str>) -> Self {
        Self::Sequence(names.into_iter().map(FilterEntry::name).collect())
    }
}

impl From<Vec<String>> for FilterSpec {
    fn from(names: Vec<String>) -> Self {
        Self::Sequence(names.into_iter().map(FilterEntry::Name).collect())
    }
}

impl<T: Into<FilterSpec>> From<Option<T>> for FilterSpec {
    fn from(spec: Option<T>) -> Self {
        spec.map(Into::into).unwrap_or_default()
    }
}
