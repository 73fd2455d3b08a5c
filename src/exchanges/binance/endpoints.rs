use crate::core::config::ExchangeConfig;
use crate::core::types::ApiRoot;

const PRODUCTION_HOST: &str = "https://api.binance.com";
const PRODUCTION_DAPI_HOST: &str = "https://dapi.binance.com";
const PRODUCTION_FAPI_HOST: &str = "https://fapi.binance.com";
const TESTNET_HOST: &str = "https://testnet.binance.vision";
const TESTNET_FAPI_HOST: &str = "https://testnet.binancefuture.com";

/// Endpoint roots for one deployment, each ending in `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub wapi: String,
    pub sapi: String,
    pub dapi: String,
    pub fapi: String,
    testnet: bool,
}

impl Endpoints {
    /// Select roots in priority order: testnet, proxy, custom base URL, production.
    pub fn from_config(config: &ExchangeConfig) -> Self {
        if config.testnet {
            return Self::testnet();
        }

        if let Some(proxy) = &config.proxy {
            return Self::single_host(&proxy.origin());
        }

        if let Some(base_url) = &config.base_url {
            return Self::single_host(base_url.trim_end_matches('/'));
        }

        Self::production()
    }

    pub fn production() -> Self {
        Self {
            api: format!("{}/api/", PRODUCTION_HOST),
            wapi: format!("{}/wapi/", PRODUCTION_HOST),
            sapi: format!("{}/sapi/", PRODUCTION_HOST),
            dapi: format!("{}/dapi/", PRODUCTION_DAPI_HOST),
            fapi: format!("{}/fapi/", PRODUCTION_FAPI_HOST),
            testnet: false,
        }
    }

    pub fn testnet() -> Self {
        Self {
            api: format!("{}/api/", TESTNET_HOST),
            wapi: format!("{}/wapi/", TESTNET_HOST),
            sapi: format!("{}/sapi/", TESTNET_HOST),
            dapi: format!("{}/dapi/", TESTNET_HOST),
            fapi: format!("{}/fapi/", TESTNET_FAPI_HOST),
            testnet: true,
        }
    }

    /// Every root served from one origin, as behind a proxy
    fn single_host(origin: &str) -> Self {
        Self {
            api: format!("{}/api/", origin),
            wapi: format!("{}/wapi/", origin),
            sapi: format!("{}/sapi/", origin),
            dapi: format!("{}/dapi/", origin),
            fapi: format!("{}/fapi/", origin),
            testnet: false,
        }
    }

    pub const fn is_testnet(&self) -> bool {
        self.testnet
    }

    pub fn root(&self, root: ApiRoot) -> &str {
        match root {
            ApiRoot::Api => &self.api,
            ApiRoot::Wapi => &self.wapi,
            ApiRoot::Sapi => &self.sapi,
            ApiRoot::Dapi => &self.dapi,
            ApiRoot::Fapi => &self.fapi,
        }
    }

    pub fn url(&self, root: ApiRoot, endpoint: &str) -> String {
        format!("{}{}", self.root(root), endpoint.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ProxyConfig;

    fn config() -> ExchangeConfig {
        ExchangeConfig::new("test_key".to_string(), "test_secret".to_string())
    }

    #[test]
    fn test_production_roots() {
        let endpoints = Endpoints::from_config(&config());

        assert_eq!(endpoints.api, "https://api.binance.com/api/");
        assert_eq!(endpoints.wapi, "https://api.binance.com/wapi/");
        assert_eq!(endpoints.sapi, "https://api.binance.com/sapi/");
        assert_eq!(endpoints.dapi, "https://dapi.binance.com/dapi/");
        assert!(!endpoints.is_testnet());
    }

    #[test]
    fn test_testnet_roots() {
        let endpoints = Endpoints::from_config(&config().testnet(true));

        assert_eq!(endpoints.api, "https://testnet.binance.vision/api/");
        assert_eq!(endpoints.wapi, "https://testnet.binance.vision/wapi/");
        assert_eq!(endpoints.sapi, "https://testnet.binance.vision/sapi/");
        assert_eq!(endpoints.dapi, "https://testnet.binance.vision/dapi/");
        assert!(endpoints.is_testnet());
    }

    #[test]
    fn test_proxy_roots() {
        let proxy = ProxyConfig::new("proxy.example.com", 8080).protocol("http");
        let endpoints = Endpoints::from_config(&config().proxy(proxy));

        assert_eq!(endpoints.api, "http://proxy.example.com:8080/api/");
        assert_eq!(endpoints.wapi, "http://proxy.example.com:8080/wapi/");
        assert_eq!(endpoints.sapi, "http://proxy.example.com:8080/sapi/");
        assert_eq!(endpoints.dapi, "http://proxy.example.com:8080/dapi/");
    }

    #[test]
    fn test_proxy_default_protocol() {
        let endpoints =
            Endpoints::from_config(&config().proxy(ProxyConfig::new("proxy.example.com", 443)));

        assert_eq!(endpoints.api, "https://proxy.example.com:443/api/");
        assert_eq!(endpoints.sapi, "https://proxy.example.com:443/sapi/");
    }

    #[test]
    fn test_testnet_ignores_proxy() {
        let endpoints = Endpoints::from_config(
            &config()
                .testnet(true)
                .proxy(ProxyConfig::new("proxy.example.com", 8080)),
        );

        assert_eq!(endpoints.api, "https://testnet.binance.vision/api/");
    }

    #[test]
    fn test_custom_base_url() {
        let endpoints =
            Endpoints::from_config(&config().base_url("https://binance.internal/".to_string()));

        assert_eq!(endpoints.api, "https://binance.internal/api/");
        assert_eq!(endpoints.sapi, "https://binance.internal/sapi/");
    }

    #[test]
    fn test_url_joins_root_and_endpoint() {
        let endpoints = Endpoints::production();

        assert_eq!(
            endpoints.url(ApiRoot::Sapi, "v1/convert/getQuote"),
            "https://api.binance.com/sapi/v1/convert/getQuote"
        );
        assert_eq!(
            endpoints.url(ApiRoot::Api, "/v3/time"),
            "https://api.binance.com/api/v3/time"
        );
    }
}
