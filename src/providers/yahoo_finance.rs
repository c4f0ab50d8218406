use super::util::{endpoint, get_json, http_client};
use crate::core::error::ConvertError;
use crate::core::rates::{RateQuery, RateQuoteProvider, RateRecord, RateResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const YQL_PATH: &str = "/v1/public/yql";
const YQL_ENV: &str = "store://datatables.org/alltableswithkeys";

fn compose_yql(query: &RateQuery) -> String {
    let pairs = query
        .pairs
        .iter()
        .map(|pair| format!("'{pair}'"))
        .collect::<Vec<_>>()
        .join(",");
    format!("select * from yahoo.finance.xchange where pair in ({pairs})")
}

#[derive(Debug, Deserialize)]
struct YqlResponse {
    query: YqlQuery,
}

#[derive(Debug, Deserialize)]
struct YqlQuery {
    results: Option<YqlResults>,
}

#[derive(Debug, Deserialize)]
struct YqlResults {
    rate: YqlRates,
}

// A lone pair comes back as an object rather than a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YqlRates {
    Many(Vec<YqlRate>),
    Single(YqlRate),
}

#[derive(Debug, Deserialize)]
struct YqlRate {
    id: String,
    // Any JSON type; only strings and numbers count as an ask.
    #[serde(rename = "Ask", default)]
    ask: Option<Value>,
}

impl From<YqlRate> for RateRecord {
    fn from(rate: YqlRate) -> Self {
        let ask = match rate.ask {
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                debug!(pair = %rate.id, ask = %other, "Ignoring ask that is not a string or number");
                None
            }
            None => None,
        };
        RateRecord { pair: rate.id, ask }
    }
}

/// Rate quotes from the YQL `yahoo.finance.xchange` table.
pub struct YahooXchangeProvider {
    base_url: String,
    client: Client,
}

impl YahooXchangeProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConvertError> {
        Ok(YahooXchangeProvider {
            base_url: base_url.to_string(),
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl RateQuoteProvider for YahooXchangeProvider {
    #[instrument(
        name = "YahooRateFetch",
        skip(self, query),
        fields(pairs = query.pairs.len())
    )]
    async fn fetch_quotes(&self, query: &RateQuery) -> Result<RateResponse, ConvertError> {
        let mut url = endpoint(&self.base_url, YQL_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", &compose_yql(query))
            .append_pair("format", "json")
            .append_pair("env", YQL_ENV);
        let url_str = url.to_string();

        let data: YqlResponse = get_json(&self.client, url).await?;
        let results = data
            .query
            .results
            .ok_or_else(|| ConvertError::malformed(&url_str, "No rate results in response"))?;

        let response = match results.rate {
            YqlRates::Single(rate) => RateResponse::Single(rate.into()),
            YqlRates::Many(rates) => RateResponse::Many(rates.into_iter().map(Into::into).collect()),
        };
        debug!(response = ?response, "Received Yahoo rates");
        Ok(response)
    }
}
