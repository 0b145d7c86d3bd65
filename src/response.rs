use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::frame::DataFrame;
use crate::model::{AliasTransform, Series, Timestamp};

/// The full result of one query: an ordered collection of series.
#[derive(Debug, Clone, Default)]
pub struct Response {
    series: Vec<Series>,
}

impl Response {
    /// Parses a raw response body. The body must be a JSON array of series
    /// objects, each carrying at least `metric`, `tags`, and `dps`.
    pub fn from_json(body: &str) -> Result<Self> {
        let series: Vec<Series> = serde_json::from_str(body)
            .map_err(|e| Error::from(("response body is not a JSON array of series", e)))?;
        Ok(Self { series })
    }

    /// Builds a response from an already-decoded JSON value. Anything other
    /// than an array is rejected as an invalid argument.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(records) => {
                let series = records
                    .into_iter()
                    .map(|record| {
                        serde_json::from_value(record)
                            .map_err(|e| Error::from(("response record is not a series object", e)))
                    })
                    .collect::<Result<Vec<Series>>>()?;
                Ok(Self { series })
            }
            other => Err(format!(
                "invalid response payload: expected an array, got {}",
                json_type(&other)
            )
            .into()),
        }
    }

    pub fn from_series(series: Vec<Series>) -> Self {
        Self { series }
    }

    /// Iterates over the series. Each call starts a fresh traversal; the
    /// underlying collection is not consumed.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Assembles the series into a frame indexed by epoch seconds, one
    /// column per series named by its id, or by `alias` when given.
    pub fn dataframe(&self, alias: Option<&AliasTransform>) -> Result<DataFrame<Timestamp>> {
        let mut columns = Vec::with_capacity(self.series.len());
        for series in self.series() {
            columns.push((display_name(series, alias), series.datapoints()?));
        }
        Ok(DataFrame::from_columns(columns))
    }

    /// Same as `dataframe`, indexed by calendar UTC instants.
    pub fn dataframe_utc(
        &self,
        alias: Option<&AliasTransform>,
    ) -> Result<DataFrame<DateTime<Utc>>> {
        let mut columns = Vec::with_capacity(self.series.len());
        for series in self.series() {
            columns.push((display_name(series, alias), series.datapoints_utc()?));
        }
        Ok(DataFrame::from_columns(columns))
    }
}

fn display_name(series: &Series, alias: Option<&AliasTransform>) -> String {
    match alias {
        Some(transform) => series.alias(transform),
        None => series.id(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
