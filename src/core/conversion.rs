//! Conversion pipeline: resolve currencies, quote rates, apply them to the amount

use crate::core::currency::{CurrencyDirectoryProvider, CurrencyResolver};
use crate::core::error::ConvertError;
use crate::core::rates::{RateQuery, RateQuoteProvider, RateRecord, RateResponse};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub input_currency: String,
    /// `None` converts into every currency in the directory.
    pub output_currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionInput {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub input: ConversionInput,
    pub output: BTreeMap<String, f64>,
}

fn to_decimal(amount: f64) -> Result<Decimal, ConvertError> {
    Decimal::from_f64(amount).ok_or(ConvertError::InvalidAmount(amount))
}

fn parse_ask(record: &RateRecord) -> Result<Decimal, ConvertError> {
    let unparsable = || ConvertError::UnparsableRate {
        pair: record.pair.clone(),
        ask: record.ask.clone().unwrap_or_default(),
    };
    let ask = record.ask.as_deref().map(str::trim).ok_or_else(unparsable)?;
    Decimal::from_str(ask)
        .or_else(|_| Decimal::from_scientific(ask))
        .map_err(|_| unparsable())
}

/// Last three characters of the pair; the first three are the input currency.
fn output_currency(pair: &str) -> Option<&str> {
    let start = pair.char_indices().rev().nth(2).map(|(i, _)| i)?;
    (start > 0).then(|| &pair[start..])
}

impl ConversionResult {
    /// Applies each quoted ask price to `amount`, rounded to cents.
    /// Records that cannot be used are logged and left out.
    pub fn from_rates(
        amount: f64,
        currency: &str,
        response: RateResponse,
    ) -> Result<Self, ConvertError> {
        let base = to_decimal(amount)?;
        let mut output = BTreeMap::new();

        for record in response.into_records() {
            let Some(currency_id) = output_currency(&record.pair) else {
                warn!(pair = %record.pair, "Skipping rate with invalid pair identifier");
                continue;
            };
            let ask = match parse_ask(&record) {
                Ok(ask) => ask,
                Err(e) => {
                    warn!(error = %e, "Skipping rate");
                    continue;
                }
            };
            let Some(value) = base
                .checked_mul(ask)
                .and_then(|v| v.round_dp(2).to_f64())
            else {
                warn!(pair = %record.pair, "Skipping rate, converted amount out of range");
                continue;
            };
            output.insert(currency_id.to_string(), value);
        }

        Ok(Self {
            input: ConversionInput {
                amount,
                currency: currency.to_string(),
            },
            output,
        })
    }
}

pub async fn convert<T: CurrencyDirectoryProvider>(
    request: &ConversionRequest,
    resolver: &CurrencyResolver<T>,
    rate_provider: &dyn RateQuoteProvider,
) -> Result<ConversionResult, ConvertError> {
    to_decimal(request.amount)?;

    let input = resolver.resolve(&request.input_currency).await?;
    let output = match request.output_currency.as_deref() {
        Some(token) => Some(resolver.resolve(token).await?),
        None => None,
    };

    let directory = resolver.directory().await?;
    let query = RateQuery::build(&input, output.as_deref(), directory.ids());
    debug!(pairs = query.pairs.len(), "Built rate query");

    let response = if query.is_empty() {
        debug!("No currency pairs to quote");
        RateResponse::Many(Vec::new())
    } else {
        rate_provider.fetch_quotes(&query).await?
    };

    ConversionResult::from_rates(request.amount, &input, response)
}
