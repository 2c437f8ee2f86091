//! Shared HTTP plumbing for adapters and cover resolvers
//!
//! One `reqwest::Client` per resolver, built from [`LookupConfig`] with
//! bounded timeouts. 404 maps to `Ok(None)` so adapters can report
//! "not found" without inspecting status codes themselves.

use crate::types::LookupError;
use leafy_common::config::LookupConfig;
use leafy_common::{Error, Result};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Build the shared client
pub fn build_client(config: &LookupConfig) -> Result<Client> {
    let user_agent = header::HeaderValue::from_str(&config.user_agent)
        .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?;
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, user_agent);

    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// GET and return the body as text; `None` on 404
pub(crate) async fn get_text(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> std::result::Result<Option<String>, LookupError> {
    match send(client, url, query).await? {
        Some(response) => Ok(Some(response.text().await?)),
        None => Ok(None),
    }
}

/// GET and decode a JSON body; `None` on 404
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> std::result::Result<Option<T>, LookupError> {
    match get_text(client, url, query).await? {
        Some(body) => serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| LookupError::Parse(format!("Invalid JSON from {}: {}", url, e))),
        None => Ok(None),
    }
}

/// GET raw bytes; `None` on 404
pub(crate) async fn get_bytes(
    client: &Client,
    url: &str,
) -> std::result::Result<Option<Vec<u8>>, LookupError> {
    match send(client, url, &[]).await? {
        Some(response) => Ok(Some(response.bytes().await?.to_vec())),
        None => Ok(None),
    }
}

async fn send(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> std::result::Result<Option<reqwest::Response>, LookupError> {
    debug!(url = %url, "GET");
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(url = %url, "404 Not Found");
        return Ok(None);
    }
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }
    Ok(Some(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_defaults() {
        assert!(build_client(&LookupConfig::default()).is_ok());
    }

    #[test]
    fn test_build_client_rejects_bad_user_agent() {
        let config = LookupConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(build_client(&config).is_err());
    }
}
