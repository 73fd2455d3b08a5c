//! Graceful degradation for calls made from long-running polling loops.
//!
//! A [`DegradingOperation`] wraps one remote call. Replies of the wrong shape
//! and, depending on the recovery predicate, failed calls are turned into a
//! fallback value so the caller always gets a usable `T`. Every substitution
//! is logged, which is the only way to tell "degraded" from "really empty".

use crate::core::errors::ExchangeError;
use crate::core::types::Reply;
use std::fmt;
use std::future::Future;
use tracing::{error, warn};

/// Why a reply was rejected by a shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// `null`, `false` or an empty body
    Empty,
    /// A reply of an unexpected shape
    UnexpectedShape(String),
    /// Right shape, missing a required field
    MissingField(&'static str),
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "returned null/false"),
            Self::UnexpectedShape(detail) => write!(f, "returned unexpected format: {}", detail),
            Self::MissingField(field) => write!(f, "returned a record without {}", field),
        }
    }
}

/// Outcome of a degrading call: the live value or a substituted fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Degraded<T> {
    Live(T),
    Fallback(T),
}

impl<T> Degraded<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }

    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub const fn get(&self) -> &T {
        match self {
            Self::Live(value) | Self::Fallback(value) => value,
        }
    }
}

type Shape<T> = Box<dyn Fn(Reply) -> Result<T, Anomaly> + Send + Sync>;
type Recover = Box<dyn Fn(&ExchangeError) -> bool + Send + Sync>;

/// Composable fallback policy around one remote call.
pub struct DegradingOperation<T> {
    name: &'static str,
    shape: Shape<T>,
    fallback: Box<dyn Fn() -> T + Send + Sync>,
    recover: Recover,
}

impl<T> fmt::Debug for DegradingOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DegradingOperation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> DegradingOperation<T> {
    /// Recovers from every failure until narrowed with [`Self::recover_when`].
    pub fn new(
        name: &'static str,
        shape: impl Fn(Reply) -> Result<T, Anomaly> + Send + Sync + 'static,
        fallback: impl Fn() -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            shape: Box::new(shape),
            fallback: Box::new(fallback),
            recover: Box::new(|_| true),
        }
    }

    /// Only degrade failures the predicate accepts; the rest propagate.
    #[must_use]
    pub fn recover_when(
        mut self,
        predicate: impl Fn(&ExchangeError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.recover = Box::new(predicate);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the wrapped call and apply the policy to its outcome.
    pub async fn run<F, Fut>(&self, call: F) -> Result<Degraded<T>, ExchangeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Reply, ExchangeError>>,
    {
        match call().await {
            Ok(reply) => Ok(self.accept(reply)),
            Err(e) => {
                error!(operation = self.name, error = %e, "Binance {} error", self.name);
                if (self.recover)(&e) {
                    warn!(
                        operation = self.name,
                        "Failure persisted after retries - returning fallback"
                    );
                    Ok(Degraded::Fallback((self.fallback)()))
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply the shape check to a reply that arrived successfully.
    pub fn accept(&self, reply: Reply) -> Degraded<T> {
        match (self.shape)(reply) {
            Ok(value) => Degraded::Live(value),
            Err(anomaly) => {
                warn!(
                    operation = self.name,
                    anomaly = %anomaly,
                    "Binance {}() {} - returning fallback",
                    self.name,
                    anomaly
                );
                Degraded::Fallback((self.fallback)())
            }
        }
    }
}
