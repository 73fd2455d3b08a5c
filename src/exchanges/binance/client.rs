use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Reply;
use crate::exchanges::binance::endpoints::Endpoints;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Binance client: the resilience and protocol layer over a [`RestClient`]
///
/// Operations live in `account` (degrading reads), `convert` (quote workflow)
/// and `earn` (Simple Earn passthroughs).
pub struct BinanceClient<R: RestClient> {
    pub(crate) rest: R,
    endpoints: Endpoints,
}

impl<R: RestClient> BinanceClient<R> {
    pub fn new(rest: R, endpoints: Endpoints) -> Self {
        Self { rest, endpoints }
    }

    pub fn rest(&self) -> &R {
        &self.rest
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn is_testnet(&self) -> bool {
        self.endpoints.is_testnet()
    }

    pub fn base(&self) -> &str {
        &self.endpoints.api
    }

    pub fn wapi(&self) -> &str {
        &self.endpoints.wapi
    }

    pub fn sapi(&self) -> &str {
        &self.endpoints.sapi
    }

    pub fn dapi(&self) -> &str {
        &self.endpoints.dapi
    }
}

/// Decode a record reply; an empty reply yields `T::default()`.
pub(crate) fn decode_record<T>(reply: Reply, what: &str) -> Result<T, ExchangeError>
where
    T: DeserializeOwned + Default,
{
    match reply {
        Reply::Empty => Ok(T::default()),
        Reply::Record(map) => serde_json::from_value(Value::Object(map)).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to decode {}: {}", what, e))
        }),
        other => Err(ExchangeError::DeserializationError(format!(
            "Expected a record for {}, got {}",
            what,
            other.kind()
        ))),
    }
}
