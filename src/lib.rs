pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::{OutputFormat, ui};
use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, ConversionResult, ConvertError, CurrencyResolver, convert};
use crate::providers::{CurrencyConverterApiProvider, YahooXchangeProvider};
use anyhow::Result;
use tracing::{debug, info};

/// Loads configuration and runs one conversion against the configured services.
pub async fn convert_with_config(
    request: &ConversionRequest,
    config_path: Option<&str>,
) -> Result<ConversionResult> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currencies_url = %config.providers.currencies.base_url,
        rates_url = %config.providers.rates.base_url,
        timeout_secs = config.timeout_secs,
        "Loaded config"
    );

    let currencies = &config.providers.currencies;
    let directory_provider = CurrencyConverterApiProvider::new(
        &currencies.base_url,
        currencies.api_key.as_deref(),
        config.timeout(),
    )?;
    let rate_provider =
        YahooXchangeProvider::new(&config.providers.rates.base_url, config.timeout())?;

    let resolver = CurrencyResolver::new(directory_provider);
    let result = convert(request, &resolver, &rate_provider).await?;
    info!(
        currency = %result.input.currency,
        outputs = result.output.len(),
        "Conversion finished"
    );
    Ok(result)
}

/// Runs a conversion and renders it in the requested format.
pub async fn run_command(
    request: &ConversionRequest,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    info!("fxconv starting...");
    let result = convert_with_config(request, config_path).await?;
    match format {
        OutputFormat::Json => ui::render_json(&result),
        OutputFormat::Table => Ok(ui::render_table(&result)),
    }
}

/// Process exit status for a failed run: the error kind's own code, or 1 for
/// configuration and other errors.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ConvertError>()
        .map_or(1, ConvertError::exit_code)
}
