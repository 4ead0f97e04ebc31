//! Scenario dataset records.
//!
//! A [`DataPoint`] is one row of the scenario table served by `/api/data`:
//! a value for one (model, scenario, region, variable, item) combination in
//! one year. Records carry no identity beyond structural equality, and two
//! records may share every dimension and year while differing in value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One record of the scenario dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Integrated assessment model name.
    #[serde(default)]
    pub model: String,
    /// Scenario name.
    #[serde(default)]
    pub scenario: String,
    /// Region (top of the filter hierarchy).
    pub region: String,
    /// Variable (depends on region).
    pub variable: String,
    /// Item (depends on region and variable).
    pub item: String,
    /// Unit of `value`.
    #[serde(default)]
    pub unit: String,
    /// Calendar year.
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i64,
    /// Observed or projected value.
    pub value: f64,
}

impl DataPoint {
    /// Build a record from its dimensions.
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        variable: impl Into<String>,
        item: impl Into<String>,
        unit: impl Into<String>,
        year: i64,
        value: f64,
    ) -> Self {
        Self {
            model: String::new(),
            scenario: String::new(),
            region: region.into(),
            variable: variable.into(),
            item: item.into(),
            unit: unit.into(),
            year,
            value,
        }
    }

    /// Set the model and scenario names.
    #[must_use]
    pub fn with_source(mut self, model: impl Into<String>, scenario: impl Into<String>) -> Self {
        self.model = model.into();
        self.scenario = scenario.into();
        self
    }

    /// Whether this record sits at the given hierarchy path.
    #[must_use]
    pub fn matches(&self, region: &str, variable: &str, item: &str) -> bool {
        self.region == region && self.variable == variable && self.item == item
    }
}

/// Decode a `/api/data` payload.
///
/// Records whose `value` is missing, null or non-numeric are dropped, the
/// same way the data service drops unparseable values before serving.
/// Anything else that does not decode fails the whole payload.
pub fn decode_records(body: &[u8]) -> serde_json::Result<Vec<DataPoint>> {
    let raw: Vec<serde_json::Map<String, Value>> = serde_json::from_slice(body)?;
    let mut records = Vec::with_capacity(raw.len());
    for row in raw {
        let numeric = row
            .get("value")
            .and_then(Value::as_f64)
            .is_some_and(f64::is_finite);
        if !numeric {
            continue;
        }
        records.push(serde_json::from_value(Value::Object(row))?);
    }
    Ok(records)
}

/// Years arrive as integers, but some exporters write `2020.0`.
fn deserialize_year<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Int(i64),
        Float(f64),
    }

    match Year::deserialize(deserializer)? {
        Year::Int(year) => Ok(year),
        Year::Float(year) if year.fract() == 0.0 && year.is_finite() => Ok(year as i64),
        Year::Float(year) => Err(serde::de::Error::custom(format!(
            "year must be integral, got {year}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_record() {
        let body = br#"[{"model":"MESSAGEix","scenario":"SSP2","region":"World","variable":"GDP","item":"Total","unit":"USD","year":2020,"value":100.5}]"#;
        let records = decode_records(body).unwrap();
        assert_eq!(
            records,
            vec![DataPoint::new("World", "GDP", "Total", "USD", 2020, 100.5)
                .with_source("MESSAGEix", "SSP2")]
        );
    }

    #[test]
    fn test_decode_float_year() {
        let body = br#"[{"region":"World","variable":"GDP","item":"Total","unit":"USD","year":2010.0,"value":1}]"#;
        let records = decode_records(body).unwrap();
        assert_eq!(records[0].year, 2010);
        assert_eq!(records[0].value, 1.0);
    }

    #[test]
    fn test_decode_fractional_year_fails() {
        let body = br#"[{"region":"World","variable":"GDP","item":"Total","year":2010.5,"value":1}]"#;
        assert!(decode_records(body).is_err());
    }

    #[test]
    fn test_decode_drops_non_numeric_values() {
        let body = br#"[
            {"region":"A","variable":"V","item":"I","year":2000,"value":null},
            {"region":"A","variable":"V","item":"I","year":2001,"value":"n/a"},
            {"region":"A","variable":"V","item":"I","year":2002},
            {"region":"A","variable":"V","item":"I","year":2003,"value":3}
        ]"#;
        let records = decode_records(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2003);
    }

    #[test]
    fn test_decode_missing_region_fails() {
        let body = br#"[{"variable":"V","item":"I","year":2000,"value":1}]"#;
        assert!(decode_records(body).is_err());
    }

    #[test]
    fn test_decode_not_an_array() {
        assert!(decode_records(br#"{"detail":"Failed to load CSV data"}"#).is_err());
    }

    #[test]
    fn test_matches() {
        let point = DataPoint::new("World", "GDP", "Total", "USD", 2020, 1.0);
        assert!(point.matches("World", "GDP", "Total"));
        assert!(!point.matches("World", "GDP", "Per capita"));
    }
}
