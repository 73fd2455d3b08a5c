//! Binance Convert: quote, then accept.
//!
//! A conversion moves `NO_QUOTE -> QUOTED -> ORDERED`. Quote expiry is enforced
//! by the exchange, so a stale quote id simply fails at accept time. Nothing
//! here retries or compensates; if the process dies between the two calls the
//! quote lapses unaccepted and `order_status` can be used to find out.

use crate::core::errors::{normalize, ExchangeError};
use crate::core::kernel::RestClient;
use crate::core::types::{ApiRoot, RemoteCall, Reply};
use crate::exchanges::binance::client::{decode_record, BinanceClient};
use crate::exchanges::binance::types::{
    ConvertExecution, ConvertOrder, ConvertQuote, ConvertTrade, QuoteRequest,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, instrument};

pub const DEFAULT_TRADE_FLOW_LIMIT: u32 = 100;

impl<R: RestClient> BinanceClient<R> {
    async fn convert_request(&self, call: RemoteCall) -> Result<Reply, ExchangeError> {
        self.rest.signed_request(&call).await.map_err(normalize)
    }

    /// Ask for a quote converting `from_asset` into `to_asset`
    ///
    /// Exactly one of `from_amount` and `to_amount` must be given.
    pub async fn request_quote(
        &self,
        from_asset: &str,
        to_asset: &str,
        from_amount: Option<Decimal>,
        to_amount: Option<Decimal>,
    ) -> Result<ConvertQuote, ExchangeError> {
        self.request_quote_with(QuoteRequest::new(
            from_asset,
            to_asset,
            from_amount,
            to_amount,
        ))
        .await
    }

    pub async fn request_quote_with(
        &self,
        request: QuoteRequest,
    ) -> Result<ConvertQuote, ExchangeError> {
        self.fetch_quote(request).await.map(|(quote, _)| quote)
    }

    /// The decoded quote together with the reply it came from
    #[instrument(skip(self, request), fields(exchange = "binance", from = %request.from_asset, to = %request.to_asset))]
    async fn fetch_quote(
        &self,
        request: QuoteRequest,
    ) -> Result<(ConvertQuote, Value), ExchangeError> {
        let call = RemoteCall::post(ApiRoot::Sapi, "v1/convert/getQuote")
            .param("fromAsset", &request.from_asset)
            .param("toAsset", &request.to_asset);

        let call = match (request.from_amount, request.to_amount) {
            (None, None) => {
                return Err(ExchangeError::InvalidParameters(
                    "Either fromAmount or toAmount must be specified".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ExchangeError::InvalidParameters(
                    "Only one of fromAmount or toAmount should be specified, not both".to_string(),
                ))
            }
            (Some(amount), None) => call.param("fromAmount", amount),
            (None, Some(amount)) => call.param("toAmount", amount),
        }
        .param_opt("walletType", request.wallet_type.as_deref())
        .param_opt("validTime", request.valid_time.as_deref())
        .signed();

        let reply = self.convert_request(call).await?;
        let raw = reply.clone().into_value();
        let quote: ConvertQuote = decode_record(reply, "quote")?;
        debug!(quote_id = ?quote.quote_id, ratio = ?quote.ratio, "Received convert quote");
        Ok((quote, raw))
    }

    /// Accept a quote, placing the conversion order
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn accept_quote(&self, quote_id: &str) -> Result<ConvertOrder, ExchangeError> {
        let call = RemoteCall::post(ApiRoot::Sapi, "v1/convert/acceptQuote")
            .param("quoteId", quote_id)
            .signed();

        decode_record(self.convert_request(call).await?, "convert order")
    }

    /// Quote and immediately accept
    ///
    /// Fails with [`ExchangeError::QuoteUnavailable`], carrying the reply as
    /// received, when the quote came back without an id; the quote is never
    /// accepted in that case.
    pub async fn convert(
        &self,
        from_asset: &str,
        to_asset: &str,
        from_amount: Option<Decimal>,
        to_amount: Option<Decimal>,
    ) -> Result<ConvertExecution, ExchangeError> {
        self.convert_with(QuoteRequest::new(
            from_asset,
            to_asset,
            from_amount,
            to_amount,
        ))
        .await
    }

    pub async fn convert_with(
        &self,
        request: QuoteRequest,
    ) -> Result<ConvertExecution, ExchangeError> {
        let (quote, raw) = self.fetch_quote(request).await?;

        let Some(quote_id) = quote.usable_quote_id() else {
            return Err(ExchangeError::QuoteUnavailable {
                payload: raw.to_string(),
            });
        };

        let order = self.accept_quote(quote_id).await?;
        info!(
            quote_id,
            order_id = ?order.order_id,
            status = ?order.order_status,
            "Convert quote accepted"
        );

        Ok(ConvertExecution { quote, order })
    }

    /// Look up a convert order by order id, quote id, or both
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn order_status(
        &self,
        order_id: Option<&str>,
        quote_id: Option<&str>,
    ) -> Result<ConvertOrder, ExchangeError> {
        if order_id.is_none() && quote_id.is_none() {
            return Err(ExchangeError::InvalidParameters(
                "Either orderId or quoteId must be specified".to_string(),
            ));
        }

        let call = RemoteCall::get(ApiRoot::Sapi, "v1/convert/orderStatus")
            .param_opt("orderId", order_id)
            .param_opt("quoteId", quote_id)
            .signed();

        decode_record(self.convert_request(call).await?, "convert order status")
    }

    /// Conversion history between two millisecond timestamps
    ///
    /// `limit` defaults to 100 and is passed through as given.
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn trade_flow(
        &self,
        start_time: i64,
        end_time: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ConvertTrade>, ExchangeError> {
        let call = RemoteCall::get(ApiRoot::Sapi, "v1/convert/tradeFlow")
            .param("startTime", start_time)
            .param("endTime", end_time)
            .param("limit", limit.unwrap_or(DEFAULT_TRADE_FLOW_LIMIT))
            .signed();

        let rows = match self.convert_request(call).await? {
            Reply::Empty => return Ok(Vec::new()),
            Reply::List(items) => items,
            Reply::Record(mut map) => match map.remove("list") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(ExchangeError::DeserializationError(format!(
                        "Expected trade flow list, got {}",
                        other
                    )))
                }
            },
            Reply::Scalar(value) => {
                return Err(ExchangeError::DeserializationError(format!(
                    "Expected trade flow list, got {}",
                    value
                )))
            }
        };

        serde_json::from_value(Value::Array(rows)).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to decode trade flow: {}", e))
        })
    }
}
