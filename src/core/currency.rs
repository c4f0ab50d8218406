//! Currency directory abstractions and symbol resolution

use crate::core::error::ConvertError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::OnceCell;
use tracing::debug;

/// Symbols shared by several currencies, pinned to the currency most people mean.
/// Applied after the directory's own symbols so these always win.
pub const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("kr", "SEK"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("ƒ", "AWG"),
    ("лв", "BGN"),
    ("₨", "PKR"),
    ("₩", "KRW"),
    ("﷼", "IRR"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRecord {
    pub id: String,
    pub symbol: Option<String>,
}

#[async_trait]
pub trait CurrencyDirectoryProvider: Send + Sync {
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyRecord>, ConvertError>;
}

/// Currencies known to the directory service, indexed by ID and by symbol.
#[derive(Debug, Clone, Default)]
pub struct CurrencyDirectory {
    by_id: BTreeMap<String, CurrencyRecord>,
    by_symbol: HashMap<String, String>,
}

impl CurrencyDirectory {
    pub fn new(records: Vec<CurrencyRecord>) -> Self {
        let by_id: BTreeMap<String, CurrencyRecord> = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        let mut by_symbol: HashMap<String, String> = by_id
            .values()
            .filter_map(|r| r.symbol.as_ref().map(|s| (s.clone(), r.id.clone())))
            .collect();

        for (symbol, id) in KNOWN_SYMBOLS {
            if by_id.contains_key(*id) {
                by_symbol.insert(symbol.to_string(), id.to_string());
            } else {
                debug!(symbol, id, "Skipping symbol override, currency not in directory");
            }
        }

        Self { by_id, by_symbol }
    }

    pub fn currencies(&self) -> &BTreeMap<String, CurrencyRecord> {
        &self.by_id
    }

    pub fn symbol_index(&self) -> &HashMap<String, String> {
        &self.by_symbol
    }

    /// Canonical IDs in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn resolve(&self, token: &str) -> Result<String, ConvertError> {
        if self.by_id.contains_key(token) {
            return Ok(token.to_string());
        }
        self.by_symbol
            .get(token)
            .cloned()
            .ok_or_else(|| ConvertError::UnknownCurrency(token.to_string()))
    }
}

/// Resolves user tokens against a directory fetched lazily, at most once.
pub struct CurrencyResolver<T: CurrencyDirectoryProvider> {
    provider: T,
    directory: OnceCell<CurrencyDirectory>,
}

impl<T: CurrencyDirectoryProvider> CurrencyResolver<T> {
    pub fn new(provider: T) -> Self {
        Self {
            provider,
            directory: OnceCell::new(),
        }
    }

    pub async fn directory(&self) -> Result<&CurrencyDirectory, ConvertError> {
        self.directory
            .get_or_try_init(|| async {
                debug!("Fetching currency directory");
                let records = self.provider.fetch_currencies().await?;
                let directory = CurrencyDirectory::new(records);
                debug!(currencies = directory.len(), "Currency directory loaded");
                Ok::<_, ConvertError>(directory)
            })
            .await
    }

    pub async fn symbol_index(&self) -> Result<&HashMap<String, String>, ConvertError> {
        Ok(self.directory().await?.symbol_index())
    }

    pub async fn resolve(&self, token: &str) -> Result<String, ConvertError> {
        let id = self.directory().await?.resolve(token)?;
        debug!(token, id = %id, "Resolved currency");
        Ok(id)
    }
}
