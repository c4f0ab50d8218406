use fxconv::cli::OutputFormat;
use fxconv::core::ConvertError;
use fxconv::core::conversion::ConversionRequest;
use std::fs;
use tracing::info;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CURRENCIES_PATH: &str = "/api/v3/currencies";
const YQL_PATH: &str = "/v1/public/yql";

const DIRECTORY_JSON: &str = r#"{
    "results": {
        "USD": {"currencyName": "United States Dollar", "currencySymbol": "$", "id": "USD"},
        "EUR": {"currencyName": "Euro", "currencySymbol": "€", "id": "EUR"},
        "GBP": {"currencyName": "British Pound", "currencySymbol": "£", "id": "GBP"}
    }
}"#;

mod test_utils {
    use super::*;

    pub async fn mount_directory(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(CURRENCIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTORY_JSON))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    pub async fn mount_rates(server: &MockServer, yql: &str, mock_response: &str) {
        Mock::given(method("GET"))
            .and(path(YQL_PATH))
            .and(query_param("q", yql))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(server)
            .await;
    }

    /// Writes a config pointing both providers at `server`. The file is removed on drop.
    pub fn write_config(server: &MockServer) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            providers:
              currencies:
                base_url: {uri}
              rates:
                base_url: {uri}
            timeout_secs: 5
        "#,
            uri = server.uri()
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }

    pub fn request(amount: f64, input: &str, output: Option<&str>) -> ConversionRequest {
        ConversionRequest {
            amount,
            input_currency: input.to_string(),
            output_currency: output.map(str::to_string),
        }
    }
}

use test_utils::*;

#[test_log::test(tokio::test)]
async fn test_symbol_to_all_currencies() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    mount_rates(
        &server,
        "select * from yahoo.finance.xchange where pair in ('USDEUR','USDGBP','USDUSD')",
        r#"{"query": {"count": 3, "results": {"rate": [
            {"id": "USDEUR", "Ask": "0.91"},
            {"id": "USDGBP", "Ask": "0.79"},
            {"id": "USDUSD", "Ask": "1.0"}
        ]}}}"#,
    )
    .await;
    let config = write_config(&server);

    let result = fxconv::convert_with_config(
        &request(100.0, "$", None),
        Some(config.path().to_str().unwrap()),
    )
    .await
    .expect("Conversion failed");
    info!(?result, "Converted");

    assert_eq!(result.input.amount, 100.0);
    assert_eq!(result.input.currency, "USD");
    assert_eq!(result.output.len(), 3);
    assert_eq!(result.output["USD"], 100.0);
    assert_eq!(result.output["EUR"], 91.0);
    assert_eq!(result.output["GBP"], 79.0);
}

#[test_log::test(tokio::test)]
async fn test_explicit_output_with_single_record() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    mount_rates(
        &server,
        "select * from yahoo.finance.xchange where pair in ('USDEUR')",
        r#"{"query": {"count": 1, "results": {"rate": {"id": "USDEUR", "Ask": "0.9123"}}}}"#,
    )
    .await;
    let config = write_config(&server);

    let output = fxconv::run_command(
        &request(100.0, "USD", Some("€")),
        Some(config.path().to_str().unwrap()),
        OutputFormat::Json,
    )
    .await
    .expect("Conversion failed");

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["input"]["currency"], "USD");
    assert_eq!(value["output"]["EUR"], 91.23);
    assert_eq!(value["output"].as_object().unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_unparsable_rate_is_skipped() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    mount_rates(
        &server,
        "select * from yahoo.finance.xchange where pair in ('GBPEUR','GBPGBP','GBPUSD')",
        r#"{"query": {"count": 3, "results": {"rate": [
            {"id": "GBPEUR", "Ask": "N/A"},
            {"id": "GBPGBP", "Ask": "1.0"},
            {"id": "GBPUSD", "Ask": "1.2650"}
        ]}}}"#,
    )
    .await;
    let config = write_config(&server);

    let output = fxconv::run_command(
        &request(10.0, "£", None),
        Some(config.path().to_str().unwrap()),
        OutputFormat::Table,
    )
    .await
    .expect("Conversion failed");

    assert!(output.contains("10.00 GBP"));
    assert!(output.contains("12.65"));
    assert!(output.contains("GBP"));
    assert!(!output.contains("EUR"));
}

#[test_log::test(tokio::test)]
async fn test_ask_of_unexpected_type_drops_only_that_pair() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    mount_rates(
        &server,
        "select * from yahoo.finance.xchange where pair in ('USDEUR','USDGBP','USDUSD')",
        r#"{"query": {"count": 3, "results": {"rate": [
            {"id": "USDEUR", "Ask": true},
            {"id": "USDGBP", "Ask": {"raw": 0.79}},
            {"id": "USDUSD", "Ask": "1.0"}
        ]}}}"#,
    )
    .await;
    let config = write_config(&server);

    let result = fxconv::convert_with_config(
        &request(20.0, "USD", None),
        Some(config.path().to_str().unwrap()),
    )
    .await
    .expect("Conversion failed");

    assert_eq!(result.output.len(), 1);
    assert_eq!(result.output["USD"], 20.0);
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_fails_without_rate_request() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(YQL_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let config = write_config(&server);

    let err = fxconv::run_command(
        &request(1.0, "USD", Some("XYZ")),
        Some(config.path().to_str().unwrap()),
        OutputFormat::Json,
    )
    .await
    .expect_err("Unknown currency should fail");

    let convert_err = err
        .downcast_ref::<ConvertError>()
        .expect("Expected a conversion error");
    assert!(matches!(convert_err, ConvertError::UnknownCurrency(token) if token == "XYZ"));
    assert_eq!(fxconv::exit_code(&err), 6);
    assert_eq!(err.to_string(), "Unknown currency passed as parameter: XYZ");
}

#[test_log::test(tokio::test)]
async fn test_rate_service_error_is_network_error() {
    let server = MockServer::start().await;
    mount_directory(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(YQL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let config = write_config(&server);

    let err = fxconv::convert_with_config(
        &request(1.0, "USD", Some("EUR")),
        Some(config.path().to_str().unwrap()),
    )
    .await
    .expect_err("Server error should fail");

    let convert_err = err.downcast_ref::<ConvertError>().unwrap();
    assert!(matches!(convert_err, ConvertError::Network { .. }));
    assert_eq!(fxconv::exit_code(&err), 3);
}

#[test_log::test(tokio::test)]
async fn test_malformed_directory_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CURRENCIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "limit exceeded"}"#))
        .mount(&server)
        .await;
    let config = write_config(&server);

    let err = fxconv::convert_with_config(
        &request(1.0, "USD", None),
        Some(config.path().to_str().unwrap()),
    )
    .await
    .expect_err("Malformed directory should fail");

    let convert_err = err.downcast_ref::<ConvertError>().unwrap();
    assert!(matches!(convert_err, ConvertError::MalformedResponse { .. }));
    assert_eq!(fxconv::exit_code(&err), 4);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("config.yaml");

    let err = fxconv::convert_with_config(
        &request(1.0, "USD", None),
        Some(missing.to_str().unwrap()),
    )
    .await
    .expect_err("Missing config should fail");

    assert!(err.downcast_ref::<ConvertError>().is_none());
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test_log::test(tokio::test)]
async fn test_unparseable_base_url_is_config_error() {
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        config_file.path(),
        r#"
        providers:
          currencies:
            base_url: "not a url"
        "#,
    )
    .unwrap();

    let err = fxconv::convert_with_config(
        &request(1.0, "USD", None),
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .expect_err("Invalid base_url should fail");

    assert!(err.downcast_ref::<ConvertError>().is_none());
    assert!(err.to_string().contains("Invalid base_url in config file"));
    assert_eq!(fxconv::exit_code(&err), 1);
}
