//! Options command implementation.
//!
//! Prints what each selector would offer for a selection path.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, SelectionArgs};
use crate::derive::DerivedView;
use crate::error::Result;
use crate::filter::{FilterState, Level};

use super::{apply_selection, connect, load_store, runtime};

#[derive(Debug, Serialize)]
struct OptionsReport<'a> {
    selection: &'a FilterState,
    regions: &'a [String],
    variables: &'a [String],
    items: &'a [String],
    total_records: usize,
}

/// Run the options command.
pub fn run(cli: &Cli, args: &SelectionArgs) -> Result<()> {
    let (_config, client) = connect(cli)?;
    let runtime = runtime()?;
    let store = load_store(&runtime, &client)?;

    let selection = apply_selection(&store, args)?;
    let view = DerivedView::compute(&store, &selection);

    match cli.effective_output() {
        OutputFormat::Json => {
            let report = OptionsReport {
                selection: &selection,
                regions: &view.regions,
                variables: &view.variables,
                items: &view.items,
                total_records: view.total_records,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if store.is_empty() {
                println!("No records loaded from {}", client.base_url());
                return Ok(());
            }
            for (level, options) in [
                (Level::Region, &view.regions),
                (Level::Variable, &view.variables),
                (Level::Item, &view.items),
            ] {
                print_level(level, selection.get(level), options);
            }
        }
    }

    Ok(())
}

fn print_level(level: Level, selected: &str, options: &[String]) {
    println!("{} ({} available)", level.label(), options.len());
    if options.is_empty() {
        println!("  (none)");
    }
    for option in options {
        let marker = if option == selected { '*' } else { ' ' };
        println!("  {marker} {option}");
    }
}
