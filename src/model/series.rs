use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::alias::AliasTransform;
use super::timestamp::{parse_timestamp, to_datetime, Timestamp};
use crate::error::Result;

pub type SampleValue = f64;

pub type Tags = HashMap<String, String>;

// Canonical `k1=v1,k2=v2` rendering with keys sorted ascending. Shared by
// series ids and query URL tag filters so both agree on one form.
pub(crate) fn format_tags(tags: &Tags) -> String {
    tags.iter()
        .collect::<BTreeMap<_, _>>()
        .iter()
        .map(|(key, val)| format!("{}={}", key, val))
        .collect::<Vec<_>>()
        .join(",")
}

/// One time series from a query response: a metric name, its identifying
/// tags, and the returned datapoints. Fields beyond the three the wire
/// format guarantees are kept verbatim in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    metric: String,
    tags: Tags,
    // Keys stay in wire form (string-encoded epoch seconds); `datapoints`
    // does the conversion.
    dps: HashMap<String, SampleValue>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl Series {
    pub fn new(
        metric: impl Into<String>,
        tags: Tags,
        dps: HashMap<String, SampleValue>,
    ) -> Self {
        Self {
            metric: metric.into(),
            tags,
            dps,
            extra: HashMap::new(),
        }
    }

    #[inline]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Additional response fields that are not part of the core schema
    /// (e.g. `aggregateTags`, annotations), untouched.
    #[inline]
    pub fn extra(&self) -> &HashMap<String, Value> {
        &self.extra
    }

    /// Canonical identifier: `metric{k1=v1,k2=v2}` with tag keys sorted
    /// ascending, or the bare metric name when there are no tags.
    pub fn id(&self) -> String {
        if self.tags.is_empty() {
            self.metric.clone()
        } else {
            format!("{}{{{}}}", self.metric, format_tags(&self.tags))
        }
    }

    /// Display name after applying a user-defined rule. A rule that fails
    /// or produces an empty string silently falls back to `id()`.
    pub fn alias(&self, transform: &AliasTransform) -> String {
        match transform.apply(&self.flattened_metadata()) {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.id(),
        }
    }

    // `{"metric": <name>}` plus `"tags.<key>" -> <value>` per tag.
    fn flattened_metadata(&self) -> HashMap<String, String> {
        let mut meta = HashMap::with_capacity(self.tags.len() + 1);
        meta.insert("metric".to_string(), self.metric.clone());
        for (key, val) in &self.tags {
            meta.insert(format!("tags.{}", key), val.clone());
        }
        meta
    }

    /// Datapoints keyed by epoch seconds. The map is deliberately
    /// unordered; the frame layer sorts when assembling an index.
    pub fn datapoints(&self) -> Result<HashMap<Timestamp, SampleValue>> {
        self.dps
            .iter()
            .map(|(key, val)| Ok((parse_timestamp(key)?, *val)))
            .collect()
    }

    /// Same as `datapoints`, with keys converted to calendar UTC instants.
    pub fn datapoints_utc(&self) -> Result<HashMap<DateTime<Utc>, SampleValue>> {
        self.dps
            .iter()
            .map(|(key, val)| Ok((to_datetime(parse_timestamp(key)?)?, *val)))
            .collect()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dps(pairs: &[(&str, f64)]) -> HashMap<String, SampleValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_id_sorts_tag_keys() {
        let forward = Series::new("sys.cpu", tags(&[("host", "a"), ("dc", "nyc")]), dps(&[]));
        let reverse = Series::new("sys.cpu", tags(&[("dc", "nyc"), ("host", "a")]), dps(&[]));

        assert_eq!("sys.cpu{dc=nyc,host=a}", forward.id());
        assert_eq!(forward.id(), reverse.id());
    }

    #[test]
    fn test_id_without_tags() {
        let series = Series::new("sys.cpu", Tags::new(), dps(&[]));
        assert_eq!("sys.cpu", series.id());
        assert_eq!("sys.cpu", format!("{}", series));
    }

    #[test]
    fn test_alias_template() {
        let series = Series::new("sys.cpu", tags(&[("host", "a"), ("dc", "nyc")]), dps(&[]));

        let t = AliasTransform::template("{tags.host}.{metric}");
        assert_eq!("a.sys.cpu", series.alias(&t));
    }

    #[test]
    fn test_alias_falls_back_to_id() {
        let series = Series::new("sys.cpu", tags(&[("host", "a")]), dps(&[]));

        // Unknown placeholder.
        let t = AliasTransform::template("{tags.rack}");
        assert_eq!(series.id(), series.alias(&t));

        // Empty result.
        let t = AliasTransform::template("");
        assert_eq!(series.id(), series.alias(&t));

        // Failing function.
        let t = AliasTransform::func(|_| None);
        assert_eq!(series.id(), series.alias(&t));
    }

    #[test]
    fn test_alias_func() {
        let series = Series::new("sys.cpu", tags(&[("host", "a")]), dps(&[]));

        let t = AliasTransform::func(|meta| {
            Some(format!("{}@{}", meta.get("metric")?, meta.get("tags.host")?))
        });
        assert_eq!("sys.cpu@a", series.alias(&t));
    }

    #[test]
    fn test_datapoints() {
        let series = Series::new(
            "sys.cpu",
            tags(&[("host", "a"), ("dc", "nyc")]),
            dps(&[("1000", 1.5), ("1010", 2.0)]),
        );

        assert_eq!("sys.cpu{dc=nyc,host=a}", series.id());

        let points = series.datapoints().unwrap();
        assert_eq!(2, points.len());
        assert_eq!(Some(&1.5), points.get(&1000));
        assert_eq!(Some(&2.0), points.get(&1010));
    }

    #[test]
    fn test_datapoints_utc() {
        let series = Series::new("sys.cpu", Tags::new(), dps(&[("1609459200", 42.0)]));

        let points = series.datapoints_utc().unwrap();
        let key = to_datetime(1609459200).unwrap();
        assert_eq!(Some(&42.0), points.get(&key));
    }

    #[test]
    fn test_datapoints_malformed_key() {
        let series = Series::new("sys.cpu", Tags::new(), dps(&[("not-a-number", 1.0)]));
        assert!(series.datapoints().is_err());
    }

    #[test]
    fn test_deserialize_keeps_extra_fields() {
        let series: Series = serde_json::from_value(serde_json::json!({
            "metric": "sys.cpu",
            "tags": {"host": "a"},
            "dps": {"1000": 1.5},
            "aggregateTags": ["dc"],
        }))
        .unwrap();

        assert_eq!("sys.cpu{host=a}", series.id());
        assert_eq!(
            Some(&serde_json::json!(["dc"])),
            series.extra().get("aggregateTags")
        );
    }
}
