use super::util::{endpoint, get_json, http_client};
use crate::core::currency::{CurrencyDirectoryProvider, CurrencyRecord};
use crate::core::error::ConvertError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const CURRENCIES_PATH: &str = "/api/v3/currencies";

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    results: HashMap<String, CurrencyEntry>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    #[serde(alias = "currencySymbol")]
    currency_symbol: Option<String>,
}

/// Currency directory backed by the currencyconverterapi.com `currencies` endpoint.
pub struct CurrencyConverterApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl CurrencyConverterApiProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConvertError> {
        Ok(CurrencyConverterApiProvider {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl CurrencyDirectoryProvider for CurrencyConverterApiProvider {
    #[instrument(name = "CurrencyDirectoryFetch", skip(self))]
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyRecord>, ConvertError> {
        let mut url = endpoint(&self.base_url, CURRENCIES_PATH)?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apiKey", key);
        }

        let data: CurrenciesResponse = get_json(&self.client, url).await?;
        debug!(currencies = data.results.len(), "Received currency directory");

        // The map key is authoritative for the ID; the entry's own `id` is not consulted.
        Ok(data
            .results
            .into_iter()
            .map(|(id, entry)| CurrencyRecord {
                id,
                symbol: entry.currency_symbol,
            })
            .collect())
    }
}
