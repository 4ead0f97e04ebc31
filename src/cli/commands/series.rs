//! Series command implementation.
//!
//! Prints the chart series for a selection path as a year/value table.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, SelectionArgs};
use crate::derive::{DerivedView, SeriesSummary};
use crate::error::Result;
use crate::filter::FilterState;
use crate::model::DataPoint;
use crate::util::format_value;

use super::{apply_selection, connect, load_store, runtime};

#[derive(Debug, Serialize)]
struct SeriesReport<'a> {
    selection: &'a FilterState,
    unit: &'a str,
    summary: Option<SeriesSummary>,
    points: &'a [DataPoint],
    total_records: usize,
}

/// Run the series command.
pub fn run(cli: &Cli, args: &SelectionArgs) -> Result<()> {
    let (_config, client) = connect(cli)?;
    let runtime = runtime()?;
    let store = load_store(&runtime, &client)?;

    let selection = apply_selection(&store, args)?;
    let view = DerivedView::compute(&store, &selection);

    match cli.effective_output() {
        OutputFormat::Json => {
            let report = SeriesReport {
                selection: &selection,
                unit: &view.unit,
                summary: view.summary(),
                points: &view.series,
                total_records: view.total_records,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_table(&selection, &view),
    }

    Ok(())
}

fn print_table(selection: &FilterState, view: &DerivedView) {
    println!(
        "{} / {} / {}",
        selection.selected_region, selection.selected_variable, selection.selected_item
    );
    if !view.unit.is_empty() {
        println!("Unit: {}", view.unit);
    }
    println!();

    if view.series.is_empty() {
        println!("No data for this selection.");
    } else {
        println!("{:>6}  {:>12}  {}", "Year", "Value", "Scenario");
        println!("{}", "-".repeat(40));
        for point in &view.series {
            println!(
                "{:>6}  {:>12}  {}",
                point.year,
                format_value(point.value),
                point.scenario
            );
        }
    }

    println!();
    println!("{}", view.footer());
}
