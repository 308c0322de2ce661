use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::{Map, Value};
use sifter::SifterConfig;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Listing",
        commands: &["sifter scopes", "sifter scopes articles"],
    },
    ExampleGroup {
        title: "Alternate Config",
        commands: &["sifter --config ./fixtures/sifter.toml scopes --output json"],
    },
];

#[derive(Args)]
pub struct ScopesArgs {
    /// Only list scopes for this query type
    pub query_type: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScopeRow {
    query_type: String,
    scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    arity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Serialize)]
pub struct ScopesReport {
    scopes: Vec<ScopeRow>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    defaults: Map<String, Value>,
}

impl TableDisplay for ScopesReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Query Type", "Scope", "Arity", "Description"]);
        for row in &self.scopes {
            table.add_row(vec![
                Cell::new(&row.query_type),
                Cell::new(&row.scope),
                Cell::new(row.arity.map_or_else(|| "any".to_string(), |arity| arity.to_string())),
                Cell::new(row.description.as_deref().unwrap_or("")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.scopes
            .iter()
            .map(|row| format!("{}.{}", row.query_type, row.scope))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collect scope rows, optionally narrowed to one query type.
///
/// Default options are only reported when a single query type is selected.
pub fn build_report(config: &SifterConfig, query_type: Option<&str>) -> Result<ScopesReport> {
    let selected: Vec<(&String, &sifter::QueryTypeConfig)> = match query_type {
        Some(name) => {
            config.query_type(name).context("Cannot list scopes")?;
            config.query_types.get_key_value(name).into_iter().collect()
        }
        None => config.query_types.iter().collect(),
    };

    let defaults = match (query_type, selected.first()) {
        (Some(_), Some((_, declared))) => declared.defaults.clone(),
        _ => Map::new(),
    };

    let scopes = selected
        .into_iter()
        .flat_map(|(type_name, declared)| {
            declared.scopes.iter().map(move |(scope, scope_config)| ScopeRow {
                query_type: type_name.clone(),
                scope: scope.clone(),
                arity: scope_config.arity,
                description: scope_config.description.clone(),
            })
        })
        .collect();

    Ok(ScopesReport { scopes, defaults })
}

pub fn handle_scopes(args: ScopesArgs, config: Option<&std::path::Path>, output: &OutputManager) -> Result<()> {
    let ctx = ConfigContext::resolve(config)?;
    output.verbose(&format!("Using config: {}", ctx.describe_source()));

    let report = build_report(&ctx.config, args.query_type.as_deref())?;

    match args.query_type.as_deref() {
        Some(name) => output.heading(&format!("Scopes: {name}")),
        None => output.heading("Scopes"),
    }
    output.key_value("Config", &ctx.describe_source());

    if report.scopes.is_empty() {
        output.warning("No scopes declared");
        if output.decorated() {
            output.info("Declare scopes under [query_types.<name>.scopes] in sifter.toml");
            return Ok(());
        }
    }

    output.display(&report)?;

    if !report.defaults.is_empty() && output.decorated() {
        output.heading("Default Options");
        for (key, value) in &report.defaults {
            output.bullet(&format!("{key} = {value}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{GlobalOptions, OutputFormat};
    use serde_json::json;

    const CONFIG: &str = r#"
[query_types.articles]
defaults = { order = "created_at desc" }

[query_types.articles.scopes]
published = { arity = 0, description = "Only published articles" }
by_author = { arity = 1 }

[query_types.users.scopes]
active = {}
"#;

    fn config() -> SifterConfig {
        SifterConfig::from_toml_str(CONFIG).unwrap()
    }

    #[test]
    fn lists_every_query_type_in_name_order() {
        let report = build_report(&config(), None).unwrap();
        assert_eq!(
            report.to_compact(),
            "articles.by_author articles.published users.active"
        );
        assert!(report.defaults.is_empty());
    }

    #[test]
    fn single_query_type_includes_defaults() {
        let report = build_report(&config(), Some("articles")).unwrap();
        assert_eq!(report.scopes.len(), 2);
        assert_eq!(
            report.scopes[1],
            ScopeRow {
                query_type: "articles".to_string(),
                scope: "published".to_string(),
                arity: Some(0),
                description: Some("Only published articles".to_string()),
            }
        );
        assert_eq!(report.defaults.get("order"), Some(&Value::from("created_at desc")));
    }

    #[test]
    fn unknown_query_type_fails() {
        let err = build_report(&config(), Some("comments")).err().expect("not configured");
        assert!(format!("{err:#}").contains("unknown query type: comments"));
    }

    #[test]
    fn empty_config_has_no_rows() {
        let report = build_report(&SifterConfig::default(), None).unwrap();
        assert!(report.scopes.is_empty());
        assert_eq!(report.to_compact(), "");
    }

    #[test]
    fn empty_report_still_renders_as_json() {
        let json = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        let report = build_report(&SifterConfig::default(), None).unwrap();
        let rendered = json.render(&report).unwrap().expect("not quiet");
        assert_eq!(serde_json::from_str::<Value>(&rendered).unwrap(), json!({ "scopes": [] }));
    }
}
