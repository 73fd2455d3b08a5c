use crate::core::errors::ExchangeError;
use std::collections::HashMap;

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// The transport calls this for every signed attempt, retries included, so a
/// fresh timestamp is signed each time. Implementations are supplied by the
/// caller; this crate ships none.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST)
    /// * `endpoint` - API endpoint path, relative to its root
    /// * `query_string` - Query string (without leading '?')
    /// * `timestamp` - Request timestamp in milliseconds
    ///
    /// # Returns
    /// Tuple of (headers, signed_query_params); the params replace the unsigned ones
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        timestamp: u64,
    ) -> SignatureResult;
}
