use crate::core::types::conversion::string_or_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Server clock reading in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTime {
    #[serde(rename = "serverTime")]
    pub server_time: i64,
}

impl ServerTime {
    /// Local wall clock, used when the exchange clock is unreachable
    pub fn local() -> Self {
        Self {
            server_time: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Which wallet `balances` reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketType {
    #[default]
    Spot,
    Futures,
}

impl MarketType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Futures => "futures",
        }
    }
}

/// Balance of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AssetBalance {
    pub available: Decimal,
    #[serde(rename = "onOrder")]
    pub on_order: Decimal,
}

impl AssetBalance {
    pub fn total(&self) -> Decimal {
        self.available + self.on_order
    }
}

#[derive(Debug, Deserialize)]
pub struct BinanceSpotBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BinanceAccountInfo {
    pub balances: Vec<BinanceSpotBalance>,
}

#[derive(Debug, Deserialize)]
pub struct BinanceFuturesBalance {
    pub asset: String,
    pub balance: Decimal,
    #[serde(rename = "availableBalance")]
    pub available_balance: Decimal,
}

/// Price commitment returned by `getQuote`; all fields optional so an empty
/// reply decodes to the empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertQuote {
    #[serde(
        rename = "quoteId",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub quote_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(rename = "inverseRatio", default, skip_serializing_if = "Option::is_none")]
    pub inverse_ratio: Option<String>,
    #[serde(rename = "validTimestamp", default, skip_serializing_if = "Option::is_none")]
    pub valid_timestamp: Option<i64>,
    #[serde(rename = "fromAmount", default, skip_serializing_if = "Option::is_none")]
    pub from_amount: Option<String>,
    #[serde(rename = "toAmount", default, skip_serializing_if = "Option::is_none")]
    pub to_amount: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConvertQuote {
    /// `quote_id`, if the exchange issued a usable one
    pub fn usable_quote_id(&self) -> Option<&str> {
        self.quote_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn ratio_decimal(&self) -> Option<Decimal> {
        self.ratio.as_deref().and_then(|r| r.parse().ok())
    }
}

/// Lifecycle state of a convert order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOrderStatus {
    Process,
    AcceptSuccess,
    Success,
    Fail,
    Other(String),
}

impl ConvertOrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Process => "PROCESS",
            Self::AcceptSuccess => "ACCEPT_SUCCESS",
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
            Self::Other(s) => s,
        }
    }

    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}

impl From<&str> for ConvertOrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "PROCESS" => Self::Process,
            "ACCEPT_SUCCESS" => Self::AcceptSuccess,
            "SUCCESS" => Self::Success,
            "FAIL" => Self::Fail,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ConvertOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConvertOrderStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConvertOrderStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Record of an accepted quote, as returned by `acceptQuote` and `orderStatus`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertOrder {
    #[serde(
        rename = "orderId",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_id: Option<String>,
    #[serde(rename = "createTime", default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(rename = "orderStatus", default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<ConvertOrderStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Quote and the order that accepted it
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertExecution {
    pub quote: ConvertQuote,
    pub order: ConvertOrder,
}

impl ConvertExecution {
    /// Field-union of quote and order; order fields win on collision.
    pub fn merged(&self) -> Map<String, Value> {
        let mut record = to_record(&self.quote);
        record.extend(to_record(&self.order));
        record
    }
}

fn to_record<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// One historical conversion from `tradeFlow`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertTrade {
    #[serde(rename = "quoteId", default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(
        rename = "orderId",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_id: Option<String>,
    #[serde(rename = "orderStatus", default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<ConvertOrderStatus>,
    #[serde(rename = "fromAsset", default, skip_serializing_if = "Option::is_none")]
    pub from_asset: Option<String>,
    #[serde(rename = "fromAmount", default, skip_serializing_if = "Option::is_none")]
    pub from_amount: Option<String>,
    #[serde(rename = "toAsset", default, skip_serializing_if = "Option::is_none")]
    pub to_asset: Option<String>,
    #[serde(rename = "toAmount", default, skip_serializing_if = "Option::is_none")]
    pub to_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(rename = "inverseRatio", default, skip_serializing_if = "Option::is_none")]
    pub inverse_ratio: Option<String>,
    #[serde(rename = "createTime", default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters of a quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub from_asset: String,
    pub to_asset: String,
    pub from_amount: Option<Decimal>,
    pub to_amount: Option<Decimal>,
    /// `SPOT` or `FUNDING`
    pub wallet_type: Option<String>,
    /// Quote lifetime such as `10s`, `30s`, `1m`
    pub valid_time: Option<String>,
}

impl QuoteRequest {
    pub fn new(
        from_asset: impl Into<String>,
        to_asset: impl Into<String>,
        from_amount: Option<Decimal>,
        to_amount: Option<Decimal>,
    ) -> Self {
        Self {
            from_asset: from_asset.into(),
            to_asset: to_asset.into(),
            from_amount,
            to_amount,
            wallet_type: None,
            valid_time: None,
        }
    }

    #[must_use]
    pub fn wallet_type(mut self, wallet_type: impl Into<String>) -> Self {
        self.wallet_type = Some(wallet_type.into());
        self
    }

    #[must_use]
    pub fn valid_time(mut self, valid_time: impl Into<String>) -> Self {
        self.valid_time = Some(valid_time.into());
        self
    }
}
