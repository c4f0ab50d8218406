use clap::Parser;
use fxconv::cli::{OutputFormat, ui};
use fxconv::core::conversion::ConversionRequest;
use fxconv::core::log::init_logging;
use std::process::ExitCode;

/// Convert value to other currencies.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Amount to convert
    #[arg(long, allow_negative_numbers = true)]
    amount: f64,

    /// Currency to convert from, as a code (USD) or symbol ($)
    #[arg(long = "input_currency", alias = "input-currency")]
    input_currency: String,

    /// Currency to convert to; all known currencies when omitted
    #[arg(long = "output_currency", alias = "output-currency")]
    output_currency: Option<String>,

    /// Output rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let request = ConversionRequest {
        amount: cli.amount,
        input_currency: cli.input_currency,
        output_currency: cli.output_currency,
    };

    match fxconv::run_command(&request, cli.config_path.as_deref(), cli.format).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            eprintln!("{}", ui::style_text(&format!("Error: {e:#}"), ui::StyleType::Error));
            ExitCode::from(fxconv::exit_code(&e))
        }
    }
}
