//! Shared HTTP plumbing for the live providers.

use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::errors::QuoteError;

/// Default request timeout for every provider call.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameter carrying the credential on every provider URL.
pub(crate) const API_KEY_PARAM: &str = "apikey";

pub(crate) fn build_client(timeout: Duration) -> Client {
    client_or_default(Client::builder().timeout(timeout).build(), timeout)
}

fn client_or_default(built: reqwest::Result<Client>, timeout: Duration) -> Client {
    match built {
        Ok(client) => client,
        Err(e) => {
            warn!(
                "Failed to build HTTP client with a {:?} timeout, requests will not time out: {}",
                timeout, e
            );
            Client::new()
        }
    }
}

/// `url` as it may appear in logs: the credential parameter is masked.
///
/// Works on the decoded query pairs, so percent-encoded keys are masked too.
pub(crate) fn redacted(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            if name == API_KEY_PARAM {
                (name.into_owned(), "***".to_string())
            } else {
                (name.into_owned(), value.into_owned())
            }
        })
        .collect();

    let mut logged = url.clone();
    logged.query_pairs_mut().clear().extend_pairs(pairs);
    logged.to_string()
}

/// Map a `reqwest` failure onto the network/transport split.
pub(crate) fn classify_request_error(provider: &str, err: &reqwest::Error) -> QuoteError {
    if err.is_timeout() {
        QuoteError::network(provider, format!("request timed out: {}", err), true)
    } else if err.is_connect() {
        QuoteError::network(provider, format!("unable to connect: {}", err), false)
    } else {
        QuoteError::transport(provider, err.to_string())
    }
}

/// GET `url` and return the response body.
///
/// The URL is logged with its credential masked.
pub(crate) async fn get_text(
    client: &Client,
    provider: &str,
    url: Url,
) -> Result<String, QuoteError> {
    debug!("{} request: {}", provider, redacted(&url));

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_request_error(provider, &e))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(QuoteError::rate_limited(provider));
    }

    // Handle unauthorized (invalid API key)
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(QuoteError::provider(provider, "Invalid or missing API key"));
    }

    if !status.is_success() {
        return Err(QuoteError::transport(provider, format!("HTTP {}", status)));
    }

    let text = response
        .text()
        .await
        .map_err(|e| classify_request_error(provider, &e))?;

    if text.trim().is_empty() {
        return Err(QuoteError::EmptyResponse {
            provider: provider.to_string(),
        });
    }

    Ok(text)
}

/// Parse a response body as JSON.
///
/// An empty JSON object counts as an empty response, not as data.
pub(crate) fn parse_json(provider: &str, text: &str) -> Result<Value, QuoteError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| QuoteError::parse(provider, format!("Invalid JSON response: {}", e)))?;

    match value {
        Value::Object(ref map) if map.is_empty() => Err(QuoteError::EmptyResponse {
            provider: provider.to_string(),
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_parse_json_malformed_is_parse_error() {
        let err = parse_json("ALPHA_VANTAGE", "<html>Service Unavailable</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_parse_json_empty_object_is_empty_response() {
        let err = parse_json("ALPHA_VANTAGE", "{}").unwrap_err();
        assert!(matches!(err, QuoteError::EmptyResponse { .. }));
    }

    #[test]
    fn test_client_build_failure_still_yields_a_client() {
        let err = Client::new().get("not a url").build().unwrap_err();
        let client = client_or_default(Err(err), DEFAULT_TIMEOUT);
        assert!(client.get("https://www.alphavantage.co/query").build().is_ok());
    }

    #[test]
    fn test_redacted_masks_encoded_key() {
        let url = Url::parse_with_params(
            "https://www.alphavantage.co/query",
            &[("function", "GLOBAL_QUOTE"), ("symbol", "IBM"), ("apikey", "ab+c/d=e")],
        )
        .unwrap();
        assert!(url.as_str().contains("ab%2Bc%2Fd%3De"));

        let logged = redacted(&url);
        assert_eq!(
            logged,
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=IBM&apikey=***"
        );
    }

    #[test]
    fn test_redacted_leaves_keyless_urls_alone() {
        let url = Url::parse("https://financialmodelingprep.com/api/v3/quote/AAPL").unwrap();
        assert_eq!(redacted(&url), url.as_str());
    }

    #[test]
    fn test_parse_json_passes_arrays() {
        let value = parse_json("FMP", "[]").unwrap();
        assert!(value.as_array().unwrap().is_empty());
    }
}
