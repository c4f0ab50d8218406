//! Rate query abstractions and core types

use crate::core::error::ConvertError;
use async_trait::async_trait;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Set of currency pairs to quote in a single request. Pairs hold canonical IDs only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RateQuery {
    pub pairs: Vec<CurrencyPair>,
}

impl RateQuery {
    /// Quotes `input` against `output`, or against every known ID when no output is given.
    pub fn build<'a>(
        input: &str,
        output: Option<&str>,
        known_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let pairs = match output {
            Some(output) => vec![CurrencyPair::new(input, output)],
            None => known_ids
                .into_iter()
                .map(|id| CurrencyPair::new(input, id))
                .collect(),
        };
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRecord {
    /// `<input><output>` as echoed back by the rate service.
    pub pair: String,
    pub ask: Option<String>,
}

/// Rate service answers with a bare record when a single pair was quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateResponse {
    Single(RateRecord),
    Many(Vec<RateRecord>),
}

impl RateResponse {
    pub fn into_records(self) -> Vec<RateRecord> {
        match self {
            RateResponse::Single(record) => vec![record],
            RateResponse::Many(records) => records,
        }
    }
}

#[async_trait]
pub trait RateQuoteProvider: Send + Sync {
    async fn fetch_quotes(&self, query: &RateQuery) -> Result<RateResponse, ConvertError>;
}
