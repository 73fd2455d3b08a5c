pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::{ExchangeConfig, ProxyConfig},
    errors::{normalize, BinanceApiError, ExchangeError},
    fallback::{Degraded, DegradingOperation},
    retry::{is_retryable, RetryPolicy, RETRYABLE_ERROR_PATTERNS},
    types::{ApiRoot, HttpMethod, RemoteCall, Reply},
};
pub use exchanges::binance::{build_client, BinanceClient, Endpoints};
