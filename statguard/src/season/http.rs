//! HTTP season source.
//!
//! Queries a season-aggregate service with a GET request built from a URL
//! template. Placeholders:
//!
//! - `{id}`: identifier without namespace (`545361`)
//! - `{namespace}`: key namespace (`player`, `team`)
//! - `{key}`: full key (`player:545361`)
//! - `{date}`: as-of date, `YYYY-MM-DD`
//!
//! Substituted values are percent-encoded, leaving only RFC 3986 unreserved
//! characters as-is.
//!
//! The service answers `{"average": 0.301}` or `{"average": null}`; a 404 is
//! read as "no data".

use std::time::Duration;

use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use serde::Deserialize;

use super::types::{BoxFuture, SeasonAggregate, SeasonQueryError};
use crate::record::StatKey;

/// Everything except `A-Z a-z 0-9 - . _ ~`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    average: Option<f64>,
}

/// Season source backed by an HTTP service.
pub struct HttpSeasonSource {
    client: reqwest::Client,
    url_template: String,
}

impl HttpSeasonSource {
    /// Create a source for `url_template`.
    ///
    /// `request_timeout` is a transport-level bound; the resolver applies its
    /// own, usually shorter, deadline on top.
    pub fn new(
        url_template: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, SeasonQueryError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                SeasonQueryError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    /// Expand the URL template for one query.
    pub fn url_for(&self, key: &StatKey, as_of: NaiveDate) -> String {
        let encode = |value: &str| utf8_percent_encode(value, COMPONENT).to_string();
        self.url_template
            .replace("{id}", &encode(key.id()))
            .replace("{namespace}", &encode(key.namespace()))
            .replace("{key}", &encode(key.as_str()))
            .replace("{date}", &as_of.format("%Y-%m-%d").to_string())
    }

    async fn fetch(&self, url: String) -> Result<Option<f64>, SeasonQueryError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SeasonQueryError::Transport(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(SeasonQueryError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SeasonQueryError::Transport(format!("Failed to read response: {}", e)))?;

        parse_response(&body)
    }
}

fn parse_response(body: &[u8]) -> Result<Option<f64>, SeasonQueryError> {
    serde_json::from_slice::<SeasonResponse>(body)
        .map(|r| r.average)
        .map_err(|e| SeasonQueryError::Decode(e.to_string()))
}

impl SeasonAggregate for HttpSeasonSource {
    fn season_average<'a>(
        &'a self,
        key: &'a StatKey,
        as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>> {
        let url = self.url_for(key, as_of);
        Box::pin(self.fetch(url))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(template: &str) -> HttpSeasonSource {
        HttpSeasonSource::new(template, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_for_expands_placeholders() {
        let source = source("http://stats.local/{namespace}/{id}?as_of={date}&k={key}");
        let url = source.url_for(
            &StatKey::player("545361"),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
        );
        assert_eq!(
            url,
            "http://stats.local/player/545361?as_of=2024-07-04&k=player%3A545361"
        );
    }

    #[test]
    fn test_url_for_encodes_reserved_characters() {
        let source = source("http://stats.local/team/{id}?as_of={date}");
        let url = source.url_for(
            &StatKey::team("St Louis&x=1/2?#"),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
        );
        assert!(url.starts_with("http://stats.local/team/St%20Louis%26x%3D1%2F2%3F%23?as_of="));
        assert!(url.ends_with("as_of=2024-07-04"));
    }

    #[test]
    fn test_parse_response_value() {
        assert_eq!(parse_response(br#"{"average": 0.301}"#), Ok(Some(0.301)));
    }

    #[test]
    fn test_parse_response_null() {
        assert_eq!(parse_response(br#"{"average": null}"#), Ok(None));
        assert_eq!(parse_response(br#"{}"#), Ok(None));
    }

    #[test]
    fn test_parse_response_garbage() {
        assert!(matches!(
            parse_response(b"<html>oops</html>"),
            Err(SeasonQueryError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let source = source("http://127.0.0.1:9/{id}");
        let result = source
            .season_average(
                &StatKey::player("1"),
                NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(SeasonQueryError::Transport(_))));
    }
}
