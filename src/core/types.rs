use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs the exchange layer issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

/// Endpoint root a call is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiRoot {
    /// `/api/` - spot market and account
    Api,
    /// `/wapi/` - legacy wallet
    Wapi,
    /// `/sapi/` - wallet, convert, earn
    Sapi,
    /// `/dapi/` - coin-margined futures
    Dapi,
    /// `/fapi/` - USD-margined futures
    Fapi,
}

/// One request against the exchange, built fresh for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub root: ApiRoot,
    pub endpoint: String,
    pub method: HttpMethod,
    pub params: BTreeMap<String, String>,
    pub signed: bool,
}

impl RemoteCall {
    pub fn new(root: ApiRoot, method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            root,
            endpoint: endpoint.into(),
            method,
            params: BTreeMap::new(),
            signed: false,
        }
    }

    pub fn get(root: ApiRoot, endpoint: impl Into<String>) -> Self {
        Self::new(root, HttpMethod::Get, endpoint)
    }

    pub fn post(root: ApiRoot, endpoint: impl Into<String>) -> Self {
        Self::new(root, HttpMethod::Post, endpoint)
    }

    #[must_use]
    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Merge caller-supplied extras; explicit parameters set earlier win.
    #[must_use]
    pub fn extend_params<K, V>(mut self, extra: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in extra {
            self.params
                .entry(key.into())
                .or_insert_with(|| value.to_string());
        }
        self
    }

    /// `k1=v1&k2=v2`, keys in sorted order
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Decoded exchange reply.
///
/// The transport decodes the body once into this sum type so callers match on
/// shape instead of probing a loose JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Record(Map<String, Value>),
    List(Vec<Value>),
    /// Numbers, strings and `true`
    Scalar(Value),
    /// Empty body, `null` or `false`
    Empty,
}

impl Reply {
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Empty,
            Value::Object(map) => Self::Record(map),
            Value::Array(items) => Self::List(items),
            scalar => Self::Scalar(scalar),
        }
    }

    /// Parse a raw response body; blank bodies are [`Reply::Empty`].
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::Empty);
        }
        serde_json::from_str(body).map(Self::decode)
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Scalar(_) => "scalar",
            Self::Empty => "empty",
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Record(map) => Value::Object(map),
            Self::List(items) => Value::Array(items),
            Self::Scalar(value) => value,
            Self::Empty => Value::Null,
        }
    }
}

pub mod conversion {
    use super::{Deserialize, Deserializer, Value};

    /// Accept an identifier sent either as a JSON number or a string
    pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected string or number, got {}",
                other
            ))),
        }
    }

    /// Integer milliseconds from a JSON number or numeric string
    pub fn millis(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}
