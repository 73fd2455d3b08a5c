pub mod account;
pub mod builder;
pub mod client;
pub mod convert;
pub mod earn;
pub mod endpoints;
pub mod types;

// Re-export main types for easier importing
pub use account::{balances_operation, open_orders_operation, time_operation, Balances};
pub use builder::{build_client, build_client_with_retry};
pub use client::BinanceClient;
pub use endpoints::Endpoints;
pub use types::{
    AssetBalance, ConvertExecution, ConvertOrder, ConvertOrderStatus, ConvertQuote, ConvertTrade,
    MarketType, QuoteRequest, ServerTime,
};
