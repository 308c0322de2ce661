use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;
use sifter::{NormalizedFilter, normalize_value};

use crate::commands::{format_args_list, parse_spec_arg};
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Shorthand Forms",
        commands: &[
            "sifter normalize active",
            "sifter normalize '[\"published\", {\"by_author\": [\"Doe\"]}]'",
            "sifter normalize '{\"active\": [], \"tagged\": [\"rust\"]}'",
        ],
    },
    ExampleGroup {
        title: "Scripting",
        commands: &["sifter --output json normalize '[\"a\", \"b\"]'"],
    },
];

#[derive(Args)]
pub struct NormalizeArgs {
    /// Filter spec: JSON, or a bare scope name
    pub spec: String,
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct NormalizeReport {
    filters: Vec<NormalizedFilter>,
}

impl TableDisplay for NormalizeReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["#", "Scope", "Arguments"]);
        for (index, filter) in self.filters.iter().enumerate() {
            let name = if filter.is_unnamed() { "(empty)" } else { filter.name.as_str() };
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(name),
                Cell::new(format_args_list(&filter.args)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.filters
            .iter()
            .map(|filter| format!("{}({})", filter.name, format_args_list(&filter.args)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn build_report(raw_spec: &str) -> Result<NormalizeReport> {
    let filters = normalize_value(parse_spec_arg(raw_spec)).context("Failed to normalize filter spec")?;
    Ok(NormalizeReport { filters })
}

pub fn handle_normalize(args: NormalizeArgs, output: &OutputManager) -> Result<()> {
    let report = build_report(&args.spec)?;

    output.heading("Normalized Filters");
    if report.filters.is_empty() && output.decorated() {
        output.info("No filters requested");
        return Ok(());
    }
    output.display(&report)?;
    if report.filters.iter().any(NormalizedFilter::is_unnamed) {
        output.warning("Empty scope names are never applied");
    }
    Ok(())
}
