//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult, convert};
pub use currency::{CurrencyDirectoryProvider, CurrencyRecord, CurrencyResolver};
pub use error::ConvertError;
pub use rates::{RateQuery, RateQuoteProvider, RateRecord, RateResponse};
