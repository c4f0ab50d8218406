use crate::core::error::ConvertError;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("fxconv/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the providers.
///
/// `timeout` bounds both connecting and the whole request; hitting it is reported
/// as a network error like any other transport failure.
pub fn http_client(timeout: Duration) -> Result<Client, ConvertError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| ConvertError::InvalidConfig(format!("cannot build HTTP client ({e})")))
}

/// Issues a single GET and decodes the JSON body. No retries.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, ConvertError> {
    let url_str = url.to_string();
    debug!("Requesting {}", url_str);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ConvertError::network(&url_str, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConvertError::Network {
            url: url_str,
            reason: format!("HTTP error: {status}"),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| ConvertError::network(&url_str, e))?;

    serde_json::from_str(&text).map_err(|e| {
        error!(error = ?e, response = %text, "Failed to parse response");
        ConvertError::malformed(&url_str, e.to_string())
    })
}

/// Joins `path` onto a configured base URL, keeping any path prefix the base carries.
pub fn endpoint(base_url: &str, path: &str) -> Result<Url, ConvertError> {
    let joined = format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined)
        .map_err(|e| ConvertError::InvalidConfig(format!("invalid base URL {base_url:?} ({e})")))
}
