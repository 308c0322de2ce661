//! `sifter.toml`: declared query types, their scopes and default options.
//!
//! ```toml
//! [sifter]
//! strict_arity = true
//!
//! [query_types.articles]
//! defaults = { order = "created_at desc" }
//!
//! [query_types.articles.scopes]
//! published = { arity = 0 }
//! by_author = { arity = 1, description = "Articles written by one author" }
//! tagged = {}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{SiftError, SiftResult};
use crate::scope::ScopeSet;

pub const CONFIG_FILE_NAME: &str = "sifter.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SifterConfig {
    #[serde(default)]
    pub sifter: SifterSettings,
    #[serde(default)]
    pub query_types: BTreeMap<String, QueryTypeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SifterSettings {
    /// Reject scope calls whose argument count differs from the declared arity.
    #[serde(default = "default_strict_arity")]
    pub strict_arity: bool,
}

impl Default for SifterSettings {
    fn default() -> Self {
        Self {
            strict_arity: default_strict_arity(),
        }
    }
}

fn default_strict_arity() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryTypeConfig {
    /// Options merged under the caller's options before the base query is built.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub defaults: Map<String, Value>,
    #[serde(default)]
    pub scopes: BTreeMap<String, ScopeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Exact argument count; `None` accepts any number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QueryTypeConfig {
    /// A query type with the given scopes, no declared arities and no defaults.
    pub fn from_scope_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            defaults: Map::new(),
            scopes: names
                .into_iter()
                .map(|name| (name.into(), ScopeConfig::default()))
                .collect(),
        }
    }

    pub fn scope_set(&self) -> ScopeSet {
        self.scopes.keys().cloned().collect()
    }
}

impl SifterConfig {
    pub fn from_toml_str(content: &str) -> SiftResult<Self> {
        toml::from_str(content).map_err(|err| SiftError::config(format!("failed to parse config: {err}")))
    }

    pub fn load(path: &Path) -> SiftResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| SiftError::config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Look for [`CONFIG_FILE_NAME`] in `start` and its ancestors.
    pub fn find_from(start: &Path) -> SiftResult<Option<(PathBuf, Self)>> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((candidate, config)));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    pub fn query_type(&self, name: &str) -> SiftResult<&QueryTypeConfig> {
        self.query_types
            .get(name)
            .ok_or_else(|| SiftError::UnknownQueryType { name: name.to_string() })
    }
}
