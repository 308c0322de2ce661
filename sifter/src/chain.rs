//! A query that records scope calls instead of executing them.
//!
//! [`ScopeChain`] is what the `sifter plan` command folds filters onto: it keeps the base
//! options and the ordered list of applied scopes, and optionally enforces declared
//! arities. [`ConfiguredQueryType`] turns a [`QueryTypeConfig`] into a [`ScopeSource`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::{QueryTypeConfig, SifterConfig};
use crate::errors::{SiftError, SiftResult};
use crate::filters::NormalizedFilter;
use crate::scope::{ScopeSet, ScopeSource, Scoped};
use crate::search::SearchOptions;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeChain {
    query_type: String,
    options: SearchOptions,
    applied: Vec<NormalizedFilter>,
    #[serde(skip)]
    arities: BTreeMap<String, usize>,
}

impl ScopeChain {
    pub fn new(query_type: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            query_type: query_type.into(),
            options,
            applied: Vec::new(),
            arities: BTreeMap::new(),
        }
    }

    /// Require `scope` to be called with exactly `arity` arguments.
    pub fn with_arity(mut self, scope: impl Into<String>, arity: usize) -> Self {
        self.arities.insert(scope.into(), arity);
        self
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn applied(&self) -> &[NormalizedFilter] {
        &self.applied
    }

    /// Render the chain the way a reader would write it, e.g. `articles.published.by_author("Doe")`.
    pub fn describe(&self) -> String {
        let mut rendered = self.query_type.clone();
        for filter in &self.applied {
            rendered.push('.');
            rendered.push_str(&filter.name);
            if !filter.args.is_empty() {
                let args: Vec<String> = filter.args.iter().map(Value::to_string).collect();
                rendered.push('(');
                rendered.push_str(&args.join(", "));
                rendered.push(')');
            }
        }
        rendered
    }
}

impl Scoped for ScopeChain {
    type Error = SiftError;

    fn apply_scope(mut self, name: &str, args: &[Value]) -> Result<Self, Self::Error> {
        if let Some(&expected) = self.arities.get(name)
            && expected != args.len()
        {
            return Err(SiftError::ScopeArity {
                scope: name.to_string(),
                expected,
                actual: args.len(),
            });
        }
        self.applied.push(NormalizedFilter::new(name, args.iter().cloned()));
        Ok(self)
    }
}

/// A query type declared in `sifter.toml` (or assembled ad hoc).
#[derive(Debug, Clone)]
pub struct ConfiguredQueryType<'a> {
    name: &'a str,
    config: &'a QueryTypeConfig,
    strict_arity: bool,
}

impl<'a> ConfiguredQueryType<'a> {
    pub fn new(name: &'a str, config: &'a QueryTypeConfig, strict_arity: bool) -> Self {
        Self {
            name,
            config,
            strict_arity,
        }
    }

    pub fn from_config(config: &'a SifterConfig, name: &'a str) -> SiftResult<Self> {
        let query_type = config.query_type(name)?;
        Ok(Self::new(name, query_type, config.sifter.strict_arity))
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl ScopeSource for ConfiguredQueryType<'_> {
    type Query = ScopeChain;

    fn scope_names(&self) -> ScopeSet {
        self.config.scope_set()
    }

    fn base_query(&self, mut options: SearchOptions) -> Result<ScopeChain, SiftError> {
        options.merge_defaults(&self.config.defaults);
        let mut chain = ScopeChain::new(self.name, options);
        if self.strict_arity {
            for (scope, declared) in &self.config.scopes {
                if let Some(arity) = declared.arity {
                    chain = chain.with_arity(scope.clone(), arity);
                }
            }
        }
        Ok(chain)
    }
}
