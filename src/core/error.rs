//! Error kinds raised while resolving currencies and fetching rates

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unknown currency passed as parameter: {0}")]
    UnknownCurrency(String),

    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// Only raised per rate record; the caller drops the record and moves on.
    #[error("Unparsable ask price {ask:?} for pair {pair}")]
    UnparsableRate { pair: String, ask: String },

    #[error("Amount {0} cannot be converted")]
    InvalidAmount(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    pub(crate) fn network(url: &str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out ({err})")
        } else if err.is_connect() {
            format!("connection failed ({err})")
        } else {
            err.to_string()
        };
        ConvertError::Network {
            url: url.to_string(),
            reason,
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        ConvertError::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status reported for this error kind. 2 belongs to clap's usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Network { .. } => 3,
            ConvertError::MalformedResponse { .. } => 4,
            ConvertError::InvalidAmount(_) => 5,
            ConvertError::UnknownCurrency(_) => 6,
            ConvertError::InvalidConfig(_) | ConvertError::UnparsableRate { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_currency_names_token() {
        let err = ConvertError::UnknownCurrency("XYZ".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown currency passed as parameter: XYZ"
        );
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            ConvertError::UnknownCurrency("X".into()).exit_code(),
            ConvertError::malformed("http://x", "bad").exit_code(),
            ConvertError::Network {
                url: "http://x".into(),
                reason: "down".into(),
            }
            .exit_code(),
            ConvertError::InvalidAmount(f64::NAN).exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            assert_ne!(*a, 1);
            assert_ne!(*a, 2);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_invalid_config_exits_like_other_config_errors() {
        let err = ConvertError::InvalidConfig("bad base URL".into());
        assert_eq!(err.to_string(), "Invalid configuration: bad base URL");
        assert_eq!(err.exit_code(), 1);
    }
}
