use crate::core::errors::{normalize, ExchangeError};
use crate::core::kernel::RestClient;
use crate::core::types::{ApiRoot, HttpMethod, RemoteCall};
use crate::exchanges::binance::client::{decode_record, BinanceClient};
use serde_json::{Map, Value};
use tracing::instrument;

/// Simple Earn endpoints under `/sapi/`, all signed
impl<R: RestClient> BinanceClient<R> {
    #[instrument(skip(self, params), fields(exchange = "binance"))]
    async fn simple_earn(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        let call = RemoteCall::new(ApiRoot::Sapi, method, endpoint)
            .extend_params(params.iter().copied())
            .signed();

        let reply = self.rest.signed_request(&call).await.map_err(normalize)?;
        decode_record(reply, endpoint)
    }

    pub async fn simple_earn_account(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Get, "v1/simple-earn/account", params)
            .await
    }

    pub async fn simple_earn_flexible_product_list(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Get, "v1/simple-earn/flexible/list", params)
            .await
    }

    pub async fn simple_earn_locked_product_list(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Get, "v1/simple-earn/locked/list", params)
            .await
    }

    pub async fn simple_earn_flexible_product_position(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Get, "v1/simple-earn/flexible/position", params)
            .await
    }

    pub async fn simple_earn_locked_product_position(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Get, "v1/simple-earn/locked/position", params)
            .await
    }

    /// Requires `productId` and `amount`
    pub async fn simple_earn_flexible_subscribe(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Post, "v1/simple-earn/flexible/subscribe", params)
            .await
    }

    /// Requires `productId`, plus `redeemAll` or `amount`
    pub async fn simple_earn_flexible_redeem(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Post, "v1/simple-earn/flexible/redeem", params)
            .await
    }

    /// Requires `projectId` and `amount`
    pub async fn simple_earn_locked_subscribe(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Map<String, Value>, ExchangeError> {
        self.simple_earn(HttpMethod::Post, "v1/simple-earn/locked/subscribe", params)
            .await
    }
}
