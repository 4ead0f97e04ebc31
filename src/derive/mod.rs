//! Derived dashboard state.
//!
//! Everything the dashboard displays besides the raw selection is a pure
//! function of the [`DataStore`] and the current [`FilterState`]:
//!
//! - option sets for each level of the region → variable → item hierarchy,
//!   each in order of first appearance in the dataset
//! - the chart series for the selected path, stably sorted by year
//! - the display unit of that series
//!
//! [`DerivationCache`] memoizes the bundled [`DerivedView`] on the
//! `(store generation, selection)` pair so redraws with unchanged inputs do
//! not rescan the dataset.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::trace;

use crate::filter::FilterState;
use crate::model::DataPoint;
use crate::store::DataStore;

/// Distinct values of one field, in order of first appearance.
fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    values
        .collect::<IndexSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Every region present in the dataset.
#[must_use]
pub fn region_options(store: &DataStore) -> Vec<String> {
    distinct(store.points().iter().map(|p| p.region.as_str()))
}

/// Variables present for `region`.
#[must_use]
pub fn variable_options(store: &DataStore, region: &str) -> Vec<String> {
    distinct(
        store
            .points()
            .iter()
            .filter(|p| p.region == region)
            .map(|p| p.variable.as_str()),
    )
}

/// Items present for `region` and `variable`.
#[must_use]
pub fn item_options(store: &DataStore, region: &str, variable: &str) -> Vec<String> {
    distinct(
        store
            .points()
            .iter()
            .filter(|p| p.region == region && p.variable == variable)
            .map(|p| p.item.as_str()),
    )
}

/// Records at the selected path, sorted by ascending year.
///
/// The sort is stable: records sharing a year keep their dataset order.
/// Duplicate years are all retained.
#[must_use]
pub fn chart_series(store: &DataStore, filter: &FilterState) -> Vec<DataPoint> {
    let mut series: Vec<DataPoint> = store
        .points()
        .iter()
        .filter(|p| p.matches(&filter.selected_region, &filter.selected_variable, &filter.selected_item))
        .cloned()
        .collect();
    series.sort_by_key(|p| p.year);
    series
}

/// Unit of the first series record, or the empty string.
#[must_use]
pub fn display_unit(series: &[DataPoint]) -> String {
    series.first().map(|p| p.unit.clone()).unwrap_or_default()
}

/// Axis bounds and counts for a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Number of plotted records.
    pub count: usize,
    /// Earliest year.
    pub first_year: i64,
    /// Latest year.
    pub last_year: i64,
    /// Smallest value.
    pub min_value: f64,
    /// Largest value.
    pub max_value: f64,
}

impl SeriesSummary {
    /// Summarize a year-sorted series; `None` when it is empty.
    #[must_use]
    pub fn of(series: &[DataPoint]) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;
        let (min_value, max_value) = series.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.value), hi.max(p.value)),
        );
        Some(Self {
            count: series.len(),
            first_year: first.year,
            last_year: last.year,
            min_value,
            max_value,
        })
    }
}

/// All derived products for one `(store, selection)` input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    /// Regions in first-appearance order.
    pub regions: Vec<String>,
    /// Variables for the selected region.
    pub variables: Vec<String>,
    /// Items for the selected region and variable.
    pub items: Vec<String>,
    /// Year-sorted records for the selected path.
    pub series: Vec<DataPoint>,
    /// Unit of the series, or empty.
    pub unit: String,
    /// Total number of records in the store.
    pub total_records: usize,
}

impl DerivedView {
    /// Compute every derived product from scratch.
    #[must_use]
    pub fn compute(store: &DataStore, filter: &FilterState) -> Self {
        let series = chart_series(store, filter);
        let unit = display_unit(&series);
        Self {
            regions: region_options(store),
            variables: variable_options(store, &filter.selected_region),
            items: item_options(store, &filter.selected_region, &filter.selected_variable),
            series,
            unit,
            total_records: store.len(),
        }
    }

    /// Summary of the chart series.
    #[must_use]
    pub fn summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::of(&self.series)
    }

    /// Footer text describing how much of the dataset is plotted.
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "Showing {} data points filtered from {} total records.",
            self.series.len(),
            self.total_records
        )
    }
}

/// Single-entry memo of the last [`DerivedView`].
#[derive(Debug, Default)]
pub struct DerivationCache {
    key: Option<(u64, FilterState)>,
    view: Option<DerivedView>,
    computations: u64,
}

impl DerivationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The view for these inputs, recomputing only when they changed.
    pub fn view(&mut self, store: &DataStore, filter: &FilterState) -> &DerivedView {
        let key = (store.generation(), filter.clone());
        if self.key.as_ref() != Some(&key) || self.view.is_none() {
            trace!(generation = key.0, "recomputing derived view");
            self.computations += 1;
            self.key = Some(key);
            self.view = None;
        }
        self.view
            .get_or_insert_with(|| DerivedView::compute(store, filter))
    }

    /// Number of times the view was actually recomputed.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> DataStore {
        DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 100.0),
            DataPoint::new("Asia", "Population", "Total", "million", 2010, 4000.0),
            DataPoint::new("World", "Emissions", "CO2", "Mt", 2010, 30.0),
            DataPoint::new("World", "GDP", "Per capita", "USD/cap", 2010, 9.0),
            DataPoint::new("World", "GDP", "Total", "USD", 2010, 80.0),
            DataPoint::new("Asia", "GDP", "Total", "USD", 2010, 20.0),
        ])
    }

    fn filter(region: &str, variable: &str, item: &str) -> FilterState {
        FilterState {
            selected_region: region.to_string(),
            selected_variable: variable.to_string(),
            selected_item: item.to_string(),
        }
    }

    #[test]
    fn test_region_options_first_appearance() {
        assert_eq!(region_options(&store()), vec!["World", "Asia"]);
    }

    #[test]
    fn test_variable_options_filtered_by_region() {
        let store = store();
        assert_eq!(variable_options(&store, "World"), vec!["GDP", "Emissions"]);
        assert_eq!(variable_options(&store, "Asia"), vec!["Population", "GDP"]);
        assert!(variable_options(&store, "Mars").is_empty());
    }

    #[test]
    fn test_item_options_filtered_by_region_and_variable() {
        let store = store();
        assert_eq!(item_options(&store, "World", "GDP"), vec!["Total", "Per capita"]);
        assert_eq!(item_options(&store, "Asia", "GDP"), vec!["Total"]);
        assert!(item_options(&store, "Asia", "Emissions").is_empty());
    }

    #[test]
    fn test_chart_series_sorted_by_year() {
        let series = chart_series(&store(), &filter("World", "GDP", "Total"));
        let points: Vec<(i64, f64)> = series.iter().map(|p| (p.year, p.value)).collect();
        assert_eq!(points, vec![(2010, 80.0), (2020, 100.0)]);
    }

    #[test]
    fn test_chart_series_keeps_duplicate_years_in_dataset_order() {
        let store = DataStore::new(vec![
            DataPoint::new("R", "V", "I", "u", 2030, 3.0),
            DataPoint::new("R", "V", "I", "u", 2020, 1.0),
            DataPoint::new("R", "V", "I", "u", 2030, 2.0),
            DataPoint::new("R", "V", "I", "u", 2020, 5.0),
        ]);
        let series = chart_series(&store, &filter("R", "V", "I"));
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 5.0, 3.0, 2.0]);
    }

    #[test]
    fn test_display_unit() {
        let store = store();
        let series = chart_series(&store, &filter("World", "GDP", "Per capita"));
        assert_eq!(display_unit(&series), "USD/cap");
        assert_eq!(display_unit(&[]), "");
    }

    #[test]
    fn test_derived_view_is_idempotent() {
        let store = store();
        let selection = filter("World", "GDP", "Total");
        assert_eq!(
            DerivedView::compute(&store, &selection),
            DerivedView::compute(&store, &selection)
        );
    }

    #[test]
    fn test_summary_and_footer() {
        let view = DerivedView::compute(&store(), &filter("World", "GDP", "Total"));
        let summary = view.summary().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!((summary.first_year, summary.last_year), (2010, 2020));
        assert_eq!((summary.min_value, summary.max_value), (80.0, 100.0));
        assert_eq!(
            view.footer(),
            "Showing 2 data points filtered from 6 total records."
        );

        let empty = DerivedView::compute(&DataStore::empty(), &FilterState::default());
        assert_eq!(empty.summary(), None);
        assert_eq!(empty.unit, "");
    }

    #[test]
    fn test_cache_recomputes_only_on_change() {
        let store = store();
        let mut cache = DerivationCache::new();
        let selection = filter("World", "GDP", "Total");

        let first = cache.view(&store, &selection).clone();
        let second = cache.view(&store, &selection).clone();
        assert_eq!(first, second);
        assert_eq!(cache.computations(), 1);

        cache.view(&store, &filter("World", "GDP", "Per capita"));
        assert_eq!(cache.computations(), 2);

        // A different snapshot with identical contents is still a new input.
        let reloaded = DataStore::new(store.points().to_vec());
        cache.view(&reloaded, &filter("World", "GDP", "Per capita"));
        assert_eq!(cache.computations(), 3);
    }
}
