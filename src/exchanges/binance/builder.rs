use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig, Signer};
use crate::core::retry::RetryPolicy;
use crate::exchanges::binance::client::BinanceClient;
use crate::exchanges::binance::endpoints::Endpoints;
use std::sync::Arc;

/// Create a Binance client backed by reqwest
///
/// Signed operations need a `signer`; without one only public calls work.
pub fn build_client(
    config: &ExchangeConfig,
    signer: Option<Arc<dyn Signer>>,
) -> Result<BinanceClient<ReqwestRest>, ExchangeError> {
    build_client_with_retry(config, signer, RetryPolicy::default())
}

pub fn build_client_with_retry(
    config: &ExchangeConfig,
    signer: Option<Arc<dyn Signer>>,
    retry: RetryPolicy,
) -> Result<BinanceClient<ReqwestRest>, ExchangeError> {
    let endpoints = Endpoints::from_config(config);

    let rest_config = RestClientConfig::new(endpoints.clone())
        .with_timeout(30)
        .with_retry_policy(retry);

    let mut rest_builder = RestClientBuilder::new(rest_config);
    if let Some(signer) = signer {
        rest_builder = rest_builder.with_signer(signer);
    }

    let rest = rest_builder.build()?;

    Ok(BinanceClient::new(rest, endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ProxyConfig;

    #[test]
    fn test_build_client_testnet() {
        let config = ExchangeConfig::read_only().testnet(true);
        let client = build_client(&config, None).unwrap();

        assert!(client.is_testnet());
        assert_eq!(client.base(), "https://testnet.binance.vision/api/");
        assert_eq!(client.rest().endpoints(), client.endpoints());
    }

    #[test]
    fn test_build_client_through_proxy() {
        let config = ExchangeConfig::read_only()
            .proxy(ProxyConfig::new("proxy.example.com", 8080).protocol("http"));
        let client = build_client_with_retry(&config, None, RetryPolicy::new(5)).unwrap();

        assert!(!client.is_testnet());
        assert_eq!(client.sapi(), "http://proxy.example.com:8080/sapi/");
        assert_eq!(client.wapi(), "http://proxy.example.com:8080/wapi/");
        assert_eq!(client.dapi(), "http://proxy.example.com:8080/dapi/");
        assert_eq!(client.rest().config().retry.max_retries, 5);
    }
}
