use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::Value;
use sifter::{
    ConfiguredQueryType, FILTERS_KEY, FilterStep, NormalizedFilter, QueryTypeConfig, SearchOptions, Sifter,
    SkipReason, StepOutcome,
};

use crate::commands::{format_args_list, parse_option, parse_spec_arg};
use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};
use crate::theme::{ICONS, THEME};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Configured Query Types",
        commands: &[
            "sifter plan articles --filters '[\"published\", {\"by_author\": [\"Doe\"]}]'",
            "sifter plan articles --filters published --option limit=10 --option order='\"title\"'",
        ],
    },
    ExampleGroup {
        title: "Ad Hoc Scopes",
        commands: &["sifter plan widgets --scopes active,featured --filters '{\"active\": [], \"hidden\": [1]}'"],
    },
];

#[derive(Args)]
pub struct PlanArgs {
    /// Query type to search (a key under [query_types] in sifter.toml)
    pub query_type: String,

    /// Filter spec: JSON, or a bare scope name
    #[arg(long, short = 'f')]
    pub filters: Option<String>,

    /// Extra find option passed to the base query (repeatable)
    #[arg(long = "option", short = 'o', value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, Value)>,

    /// Supported scopes, bypassing sifter.toml
    #[arg(long, value_delimiter = ',')]
    pub scopes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct PlanReport {
    query_type: String,
    steps: Vec<FilterStep>,
    applied: Vec<NormalizedFilter>,
    chain: String,
    options: SearchOptions,
}

impl PlanReport {
    fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Skipped(_)))
            .count()
    }
}

impl TableDisplay for PlanReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["#", "Scope", "Arguments", "Outcome"]);
        for (index, step) in self.steps.iter().enumerate() {
            let name = if step.filter.is_unnamed() { "(empty)" } else { step.filter.name.as_str() };
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(name),
                Cell::new(format_args_list(&step.filter.args)),
                Cell::new(outcome_label(step.outcome, output.options.no_color)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.chain.clone()
    }
}

fn outcome_label(outcome: StepOutcome, no_color: bool) -> String {
    let (icon, text, color) = match outcome {
        StepOutcome::Applied => (ICONS.success, "applied".to_string(), THEME.success),
        StepOutcome::Skipped(SkipReason::EmptyName) => (ICONS.skip, "skipped: empty name".to_string(), THEME.muted),
        StepOutcome::Skipped(reason) => (ICONS.skip, format!("skipped: {}", reason.as_str()), THEME.warning),
    };
    let label = format!("{icon} {text}");
    if no_color { label } else { label.color(color).to_string() }
}

pub fn build_report(args: PlanArgs, ctx: &ConfigContext) -> Result<PlanReport> {
    let PlanArgs {
        query_type,
        filters,
        options,
        scopes,
    } = args;

    let ad_hoc;
    let source = match scopes {
        Some(names) => {
            ad_hoc = QueryTypeConfig::from_scope_names(names);
            ConfiguredQueryType::new(&query_type, &ad_hoc, ctx.config.sifter.strict_arity)
        }
        None => ConfiguredQueryType::from_config(&ctx.config, &query_type)
            .with_context(|| format!("Cannot plan against '{query_type}' ({})", ctx.describe_source()))?,
    };

    let mut search_options: SearchOptions = options.into_iter().collect();
    if let Some(raw) = filters.as_deref() {
        search_options.insert(FILTERS_KEY, parse_spec_arg(raw));
    }

    let sifter = Sifter::new(&source, search_options).context("Failed to normalize filter spec")?;
    let steps = sifter.explain();
    let chain = sifter.search().context("Failed to apply scopes")?;

    Ok(PlanReport {
        query_type: chain.query_type().to_string(),
        steps,
        applied: chain.applied().to_vec(),
        chain: chain.describe(),
        options: chain.options().clone(),
    })
}

pub fn handle_plan(args: PlanArgs, config: Option<&std::path::Path>, output: &OutputManager) -> Result<()> {
    let ctx = ConfigContext::resolve(config)?;
    output.verbose(&format!("Using config: {}", ctx.describe_source()));

    let report = build_report(args, &ctx)?;

    output.heading(&format!("Search Plan: {}", report.query_type));
    if report.steps.is_empty() {
        output.info("No filters requested; the base query is used as is");
    } else {
        output.display(&report)?;
    }

    if output.decorated() {
        output.key_value("Chain", &report.chain);
        let options = serde_json::to_string(&report.options)?;
        output.key_value("Base options", &options);
        let skipped = report.skipped();
        if skipped == 0 {
            output.success(&format!("{} scope(s) applied", report.applied.len()));
        } else {
            output.success(&format!("{} scope(s) applied, {skipped} skipped", report.applied.len()));
        }
    } else if !output.options.quiet && report.steps.is_empty() {
        output.display(&report)?;
    }

    Ok(())
}
