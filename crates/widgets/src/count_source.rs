//! Where the counter's initial value comes from.
//!
//! The production source asks a random-number service over HTTP. The response
//! must be a JSON array holding exactly one integer; anything else is rejected
//! with a specific [`FetchError`] rather than being read leniently.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

/// Service queried by [`HttpCountSource`] unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str =
    "http://www.randomnumberapi.com/api/v1.0/random?min=0&max=99&count=1";

/// Count used when the source fails.
pub const FALLBACK_COUNT: i64 = 99;

/// Error fetching the initial count.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Connecting, sending or reading the response failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned status {0}")]
    Status(u16),

    /// The body is not a JSON array.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The array does not hold exactly one element.
    #[error("expected exactly one count, got {0}")]
    WrongLength(usize),

    /// The single element is not an integer.
    #[error("count is not an integer: {0}")]
    NotAnInteger(String),

    /// The source is not available at all.
    #[error("count source unavailable: {0}")]
    Unavailable(String),
}

/// A collaborator that produces the counter's initial value.
///
/// `fetch` blocks; callers run it inside a command, off the event loop.
pub trait CountSource: Send + Sync {
    /// Fetch one count.
    fn fetch(&self) -> Result<i64, FetchError>;

    /// Human-readable description for diagnostics.
    fn describe(&self) -> String;
}

/// Parse a response body of the form `[n]`.
///
/// ```rust
/// use widgets::parse_count;
///
/// assert_eq!(parse_count("[42]").unwrap(), 42);
/// assert!(parse_count("[]").is_err());
/// assert!(parse_count("[1, 2]").is_err());
/// assert!(parse_count("{\"n\": 1}").is_err());
/// ```
pub fn parse_count(body: &str) -> Result<i64, FetchError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(body)?;
    match values.as_slice() {
        [value] => value
            .as_i64()
            .ok_or_else(|| FetchError::NotAnInteger(value.to_string())),
        other => Err(FetchError::WrongLength(other.len())),
    }
}

/// Count source backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCountSource {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpCountSource {
    /// Create a source for the given endpoint with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// The endpoint queried.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CountSource for HttpCountSource {
    fn fetch(&self) -> Result<i64, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching initial count");
        let response = self
            .client
            .get(&self.endpoint)
            .header(USER_AGENT, concat!("counter-demo/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_count(&body)
    }

    fn describe(&self) -> String {
        format!("http {} (timeout {}ms)", self.endpoint, self.timeout.as_millis())
    }
}

/// Count source that answers without any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCountSource {
    outcome: Result<i64, String>,
}

impl FixedCountSource {
    /// Always succeed with `count`.
    pub fn ok(count: i64) -> Self {
        Self { outcome: Ok(count) }
    }

    /// Always fail with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
        }
    }
}

impl CountSource for FixedCountSource {
    fn fetch(&self) -> Result<i64, FetchError> {
        self.outcome.clone().map_err(FetchError::Unavailable)
    }

    fn describe(&self) -> String {
        match &self.outcome {
            Ok(count) => format!("fixed {count}"),
            Err(reason) => format!("fixed failure ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_integer() {
        assert_eq!(parse_count("[42]").unwrap(), 42);
        assert_eq!(parse_count(" [ 0 ]\n").unwrap(), 0);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(matches!(parse_count("[]"), Err(FetchError::WrongLength(0))));
        assert!(matches!(
            parse_count("[3, 4]"),
            Err(FetchError::WrongLength(2))
        ));
        assert!(matches!(parse_count("7"), Err(FetchError::Malformed(_))));
        assert!(matches!(parse_count("not json"), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        let err = parse_count("[\"42\"]").unwrap_err();
        assert_eq!(err.to_string(), "count is not an integer: \"42\"");
        assert!(matches!(
            parse_count("[4.5]"),
            Err(FetchError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_fixed_source() {
        assert_eq!(FixedCountSource::ok(7).fetch().unwrap(), 7);
        let err = FixedCountSource::failing("offline").fetch().unwrap_err();
        assert_eq!(err.to_string(), "count source unavailable: offline");
        assert_eq!(FixedCountSource::ok(7).describe(), "fixed 7");
    }

    #[test]
    fn test_http_source_unreachable_endpoint_fails() {
        // Port 9 (discard) on localhost is closed in test environments.
        let source =
            HttpCountSource::new("http://127.0.0.1:9/random", Duration::from_millis(200)).unwrap();
        assert!(matches!(source.fetch(), Err(FetchError::Request(_))));
        assert!(source.describe().starts_with("http http://127.0.0.1:9/random"));
    }
}
