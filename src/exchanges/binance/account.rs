use crate::core::errors::ExchangeError;
use crate::core::fallback::{Anomaly, DegradingOperation};
use crate::core::kernel::RestClient;
use crate::core::retry::is_timestamp_error;
use crate::core::types::conversion::millis;
use crate::core::types::{ApiRoot, RemoteCall, Reply};
use crate::exchanges::binance::client::BinanceClient;
use crate::exchanges::binance::types::{
    AssetBalance, BinanceAccountInfo, BinanceFuturesBalance, MarketType, ServerTime,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

pub type Balances = HashMap<String, AssetBalance>;

/// Balances degrade to an empty map only for recvWindow failures; every other
/// failure reaches the caller.
pub fn balances_operation(market_type: MarketType) -> DegradingOperation<Balances> {
    DegradingOperation::new(
        "balances",
        move |reply| match market_type {
            MarketType::Spot => spot_balances(reply),
            MarketType::Futures => futures_balances(reply),
        },
        Balances::new,
    )
    .recover_when(|e| is_timestamp_error(&e.to_string()))
}

fn spot_balances(reply: Reply) -> Result<Balances, Anomaly> {
    let map = match reply {
        Reply::Record(map) => map,
        Reply::Empty => return Err(Anomaly::Empty),
        other => return Err(Anomaly::UnexpectedShape(other.kind().to_string())),
    };

    let info: BinanceAccountInfo = serde_json::from_value(Value::Object(map))
        .map_err(|e| Anomaly::UnexpectedShape(e.to_string()))?;

    Ok(info
        .balances
        .into_iter()
        .map(|b| {
            (
                b.asset,
                AssetBalance {
                    available: b.free,
                    on_order: b.locked,
                },
            )
        })
        .collect())
}

fn futures_balances(reply: Reply) -> Result<Balances, Anomaly> {
    let items = match reply {
        Reply::List(items) => items,
        Reply::Empty => return Err(Anomaly::Empty),
        other => return Err(Anomaly::UnexpectedShape(other.kind().to_string())),
    };

    let rows: Vec<BinanceFuturesBalance> = serde_json::from_value(Value::Array(items))
        .map_err(|e| Anomaly::UnexpectedShape(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|b| {
            (
                b.asset,
                AssetBalance {
                    available: b.available_balance,
                    on_order: b.balance - b.available_balance,
                },
            )
        })
        .collect())
}

/// Server time never fails: anything unusable becomes the local clock.
pub fn time_operation() -> DegradingOperation<ServerTime> {
    DegradingOperation::new("time", server_time, ServerTime::local)
}

fn server_time(reply: Reply) -> Result<ServerTime, Anomaly> {
    match reply {
        Reply::Record(map) => match map.get("serverTime") {
            None => Err(Anomaly::MissingField("serverTime")),
            Some(value) => millis(value)
                .map(|server_time| ServerTime { server_time })
                .ok_or_else(|| Anomaly::UnexpectedShape(format!("serverTime = {}", value))),
        },
        Reply::Scalar(value) => millis(&value)
            .map(|server_time| ServerTime { server_time })
            .ok_or_else(|| Anomaly::UnexpectedShape(value.to_string())),
        Reply::Empty => Err(Anomaly::Empty),
        Reply::List(_) => Err(Anomaly::UnexpectedShape("list".to_string())),
    }
}

/// Open orders never fail: anything but a list becomes an empty list.
pub fn open_orders_operation() -> DegradingOperation<Vec<Value>> {
    DegradingOperation::new(
        "openOrders",
        |reply| match reply {
            Reply::List(orders) => Ok(orders),
            Reply::Empty => Err(Anomaly::Empty),
            other => Err(Anomaly::UnexpectedShape(other.into_value().to_string())),
        },
        Vec::new,
    )
}

impl<R: RestClient> BinanceClient<R> {
    /// Balances keyed by asset
    ///
    /// `api_version` defaults to `v3` for spot and `v2` for futures. A
    /// recvWindow failure that survived the transport's retries yields an
    /// empty map; other failures are returned.
    #[instrument(skip(self, params), fields(exchange = "binance", market_type = market_type.as_str()))]
    pub async fn balances(
        &self,
        market_type: MarketType,
        params: &[(&str, &str)],
        api_version: Option<&str>,
    ) -> Result<Balances, ExchangeError> {
        let call = match market_type {
            MarketType::Spot => RemoteCall::get(
                ApiRoot::Api,
                format!("{}/account", api_version.unwrap_or("v3")),
            ),
            MarketType::Futures => RemoteCall::get(
                ApiRoot::Fapi,
                format!("{}/balance", api_version.unwrap_or("v2")),
            ),
        }
        .extend_params(params.iter().copied())
        .signed();

        balances_operation(market_type)
            .run(|| self.rest.signed_request(&call))
            .await
            .map(|result| result.into_inner())
    }

    /// Exchange clock, or the local clock when the exchange can't tell us
    #[instrument(skip(self, params), fields(exchange = "binance"))]
    pub async fn time(&self, params: &[(&str, &str)]) -> ServerTime {
        let call = RemoteCall::get(ApiRoot::Api, "v3/time").extend_params(params.iter().copied());

        time_operation()
            .run(|| self.rest.signed_request(&call))
            .await
            .map_or_else(|_| ServerTime::local(), |result| result.into_inner())
    }

    /// Open orders, optionally for one symbol; empty on any failure
    #[instrument(skip(self, params), fields(exchange = "binance", symbol = ?symbol))]
    pub async fn open_orders(&self, symbol: Option<&str>, params: &[(&str, &str)]) -> Vec<Value> {
        let call = RemoteCall::get(ApiRoot::Api, "v3/openOrders")
            .param_opt("symbol", symbol)
            .extend_params(params.iter().copied())
            .signed();

        open_orders_operation()
            .run(|| self.rest.signed_request(&call))
            .await
            .map(|result| result.into_inner())
            .unwrap_or_default()
    }
}
