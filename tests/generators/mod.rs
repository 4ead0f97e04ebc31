//! Synthetic scenario dataset generators.
//!
//! Builds `DataPoint` tables and `/api/data` bodies for tests and property
//! strategies.

#![allow(dead_code)]

use proptest::prelude::*;
use scenario_dash::model::DataPoint;
use serde_json::json;

/// Shape of a generated dataset.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Region names.
    pub regions: Vec<&'static str>,
    /// Variable names with their unit.
    pub variables: Vec<(&'static str, &'static str)>,
    /// Item names.
    pub items: Vec<&'static str>,
    /// Years to emit for every combination.
    pub years: Vec<i64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            regions: vec!["World", "Asia", "Europe"],
            variables: vec![("GDP", "USD"), ("Population", "million"), ("Emissions", "Mt")],
            items: vec!["Total", "Per capita"],
            years: vec![2030, 2010, 2020, 2050, 2040],
        }
    }
}

/// Full cross product of the configured dimensions, years in the given order.
pub fn generate_dataset(config: &DatasetConfig) -> Vec<DataPoint> {
    let mut points = Vec::new();
    for (r, region) in config.regions.iter().enumerate() {
        for (variable, unit) in &config.variables {
            for item in &config.items {
                for year in &config.years {
                    let value = (r as f64 + 1.0) * (*year as f64 - 2000.0);
                    points.push(
                        DataPoint::new(*region, *variable, *item, *unit, *year, value)
                            .with_source("MESSAGE", "SSP2"),
                    );
                }
            }
        }
    }
    points
}

/// Serialize records the way `/api/data` returns them.
pub fn dataset_body(points: &[DataPoint]) -> Vec<u8> {
    let rows: Vec<serde_json::Value> = points
        .iter()
        .map(|p| {
            json!({
                "model": p.model,
                "scenario": p.scenario,
                "region": p.region,
                "variable": p.variable,
                "item": p.item,
                "unit": p.unit,
                "year": p.year,
                "value": p.value,
            })
        })
        .collect();
    serde_json::to_vec(&rows).unwrap_or_default()
}

/// Records drawn from small dimension alphabets so paths collide often.
pub fn arb_point() -> impl Strategy<Value = DataPoint> {
    (
        prop::sample::select(vec!["World", "Asia", "Africa"]),
        prop::sample::select(vec!["GDP", "Population", "Emissions"]),
        prop::sample::select(vec!["Total", "Urban", "Rural"]),
        prop::sample::select(vec!["USD", "million", "Mt"]),
        1990i64..2100,
        -1.0e6f64..1.0e6,
    )
        .prop_map(|(region, variable, item, unit, year, value)| {
            DataPoint::new(region, variable, item, unit, year, value)
        })
}

/// A dataset of up to `max` records.
pub fn arb_dataset(max: usize) -> impl Strategy<Value = Vec<DataPoint>> {
    prop::collection::vec(arb_point(), 0..max)
}
