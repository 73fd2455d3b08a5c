use serde_json::Value;
use thiserror::Error;

/// Prefix the transport puts in front of a raw exchange error body.
pub const SIGNED_REQUEST_MARKER: &str = "signedRequest error: ";

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Non-success reply from the exchange, carrying the raw response body.
    #[error("signedRequest error: {0}")]
    SignedRequest(String),

    #[error(transparent)]
    Binance(#[from] BinanceApiError),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error(transparent)]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Failed to get quote: {payload}")]
    QuoteUnavailable { payload: String },

    #[error("Other error: {0}")]
    Other(String),
}

/// Canonical error carrying the exchange-supplied message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BinanceApiError {
    pub message: String,
}

impl BinanceApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reshape a failed signed request into [`BinanceApiError`].
///
/// Errors whose message starts with [`SIGNED_REQUEST_MARKER`] become the
/// canonical error, using the `msg` field of the JSON body when present and
/// the stripped text otherwise. Anything else is handed back unchanged.
pub fn normalize(err: ExchangeError) -> ExchangeError {
    let rendered = err.to_string();
    let Some(body) = rendered.strip_prefix(SIGNED_REQUEST_MARKER) else {
        return err;
    };

    let body = body.trim();
    if body.is_empty() {
        return err;
    }

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| exchange_message(&json))
        .unwrap_or_else(|| body.to_string());

    ExchangeError::Binance(BinanceApiError { message })
}

fn exchange_message(json: &Value) -> Option<String> {
    match json.get("msg")? {
        Value::String(msg) if !msg.is_empty() => Some(msg.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;

    #[test]
    fn test_normalize_uses_exchange_msg() {
        let err = ExchangeError::SignedRequest(r#"{"code":-2015,"msg":"Invalid API-key"}"#.into());

        match normalize(err) {
            ExchangeError::Binance(e) => assert_eq!(e.message, "Invalid API-key"),
            other => panic!("expected canonical error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_keeps_raw_text_when_not_json() {
        let err = ExchangeError::SignedRequest("  gateway exploded  ".into());

        match normalize(err) {
            ExchangeError::Binance(e) => assert_eq!(e.message, "gateway exploded"),
            other => panic!("expected canonical error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_keeps_raw_text_when_msg_missing_or_empty() {
        let err = ExchangeError::SignedRequest(r#"{"code":-1000,"msg":""}"#.into());
        match normalize(err) {
            ExchangeError::Binance(e) => assert_eq!(e.message, r#"{"code":-1000,"msg":""}"#),
            other => panic!("expected canonical error, got {other:?}"),
        }

        let err = ExchangeError::SignedRequest(r#"{"code":-1000}"#.into());
        match normalize(err) {
            ExchangeError::Binance(e) => assert_eq!(e.message, r#"{"code":-1000}"#),
            other => panic!("expected canonical error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_passes_through_unmarked_errors() {
        let err = ExchangeError::NetworkError("Connection timed out".into());

        match normalize(err) {
            ExchangeError::NetworkError(msg) => assert_eq!(msg, "Connection timed out"),
            other => panic!("expected original error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_marker_with_blank_body_is_unchanged() {
        let err = ExchangeError::SignedRequest("   ".into());
        assert!(matches!(normalize(err), ExchangeError::SignedRequest(_)));
    }

    #[test]
    fn test_config_error_keeps_its_own_message() {
        let err = ExchangeError::from(ConfigError::InvalidConfiguration("bad proxy".into()));
        assert_eq!(err.to_string(), "Invalid configuration: bad proxy");
        assert!(matches!(normalize(err), ExchangeError::ConfigError(_)));
    }

    #[test]
    fn test_normalize_already_canonical_is_unchanged() {
        let err = ExchangeError::Binance(BinanceApiError::new("Invalid API-key"));

        match normalize(err) {
            ExchangeError::Binance(e) => assert_eq!(e.message, "Invalid API-key"),
            other => panic!("expected canonical error, got {other:?}"),
        }
    }
}
