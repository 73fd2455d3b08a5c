//! Transport layer consumed by the resilience core
//!
//! The core never talks HTTP itself. It hands a [`RemoteCall`] to a
//! [`RestClient`] and works with the decoded [`Reply`]. [`ReqwestRest`] is the
//! stock implementation:
//!
//! - routes the call to its endpoint root (see `exchanges::binance::endpoints`)
//! - signs through a caller-supplied [`Signer`]
//! - retries failures the classifier in `core::retry` marks transient
//! - renders non-success bodies as `signedRequest error: <body>`
//!
//! # Example
//! ```rust,no_run
//! use binance_guard::core::kernel::*;
//! use binance_guard::core::types::{ApiRoot, RemoteCall};
//! use binance_guard::exchanges::binance::Endpoints;
//! use binance_guard::core::config::ExchangeConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExchangeConfig::read_only().testnet(true);
//! let rest = RestClientBuilder::new(RestClientConfig::new(Endpoints::from_config(&config)))
//!     .build()?;
//!
//! let reply = rest.signed_request(&RemoteCall::get(ApiRoot::Api, "v3/time")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RemoteCall`]: crate::core::types::RemoteCall
//! [`Reply`]: crate::core::types::Reply

pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{SignatureResult, Signer};
