pub mod currency_converter_api;
pub mod util;
pub mod yahoo_finance;

pub use currency_converter_api::CurrencyConverterApiProvider;
pub use yahoo_finance::YahooXchangeProvider;
