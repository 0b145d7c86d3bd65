use reqwest::blocking;

use crate::error::{Error, Result};
use crate::model::{format_tags, Tags};
use crate::response::Response;

/// Query parameters for one `/api/query` call. `start` and `metric` are
/// required; everything else has the server's defaults.
#[derive(Debug, Clone)]
pub struct QueryParams {
    start: String,
    end: Option<String>,
    metric: String,
    tags: Tags,
    aggregator: String,
    rate: bool,
    counter: bool,
}

impl QueryParams {
    pub fn new(start: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
            metric: metric.into(),
            tags: Tags::new(),
            aggregator: "sum".to_string(),
            rate: false,
            counter: false,
        }
    }

    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn aggregator(mut self, aggregator: impl Into<String>) -> Self {
        self.aggregator = aggregator.into();
        self
    }

    pub fn rate(mut self, rate: bool) -> Self {
        self.rate = rate;
        self
    }

    pub fn counter(mut self, counter: bool) -> Self {
        self.counter = counter;
        self
    }

    fn to_query_string(&self) -> String {
        let mut time = format!("start={}", self.start);
        if let Some(end) = &self.end {
            time.push_str("&end=");
            time.push_str(end);
        }

        // rate wins when both flags are set.
        let func = if self.rate {
            format!("{}:rate:{}", self.aggregator, self.metric)
        } else if self.counter {
            format!("{}:rate{{counter,,1}}:{}", self.aggregator, self.metric)
        } else {
            format!("{}:{}", self.aggregator, self.metric)
        };

        if self.tags.is_empty() {
            format!("{}&m={}", time, func)
        } else {
            format!("{}&m={}{{{}}}", time, func, format_tags(&self.tags))
        }
    }
}

/// The outcome of a query that completed an HTTP exchange: either a parsed
/// set of series, or the server's error status and raw body.
#[derive(Debug)]
pub enum QueryOutcome {
    Series(Response),
    Failed { status: u16, body: String },
}

impl QueryOutcome {
    pub fn is_series(&self) -> bool {
        matches!(self, QueryOutcome::Series(_))
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            QueryOutcome::Series(resp) => Some(resp),
            QueryOutcome::Failed { .. } => None,
        }
    }
}

/// A blocking client bound to one OpenTSDB endpoint. Holds nothing but the
/// base URL and the HTTP transport.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: blocking::Client,
}

impl Client {
    pub fn new(host: &str, port: u16, ssl: bool) -> Self {
        Self::with_http(host, port, ssl, blocking::Client::new())
    }

    /// Like `new`, with a caller-configured transport. Timeouts, proxies,
    /// and TLS options belong on the `reqwest` client passed here.
    pub fn with_http(host: &str, port: u16, ssl: bool, http: blocking::Client) -> Self {
        let scheme = if ssl { "https" } else { "http" };
        Self {
            base_url: format!("{}://{}:{}", scheme, host, port),
            http,
        }
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full query URL for the given parameters:
    /// `<base>/api/query?start=...[&end=...]&m=<func>:<metric>[{tags}]`.
    pub fn query_url(&self, params: &QueryParams) -> String {
        format!("{}/api/query?{}", self.base_url, params.to_query_string())
    }

    /// Issues the query and blocks until the exchange completes. A status
    /// in `[200, 400)` yields parsed series; any other status yields
    /// `QueryOutcome::Failed` with the raw body. Transport failures
    /// (connect, read) are `Err`.
    pub fn query(&self, params: &QueryParams) -> Result<QueryOutcome> {
        let url = self.query_url(params);
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| Error::from((format!("GET {} failed", url), e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| Error::from(("couldn't read response body", e)))?;

        if (200..400).contains(&status) {
            Ok(QueryOutcome::Series(Response::from_json(&body)?))
        } else {
            Ok(QueryOutcome::Failed { status, body })
        }
    }
}
