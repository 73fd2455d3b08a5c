use crate::core::config::ConfigError;
use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::Signer;
use crate::core::retry::{is_retryable, RetryPolicy};
use crate::core::types::{RemoteCall, Reply};
use crate::exchanges::binance::endpoints::Endpoints;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_retry::RetryIf;
use tracing::{debug, instrument, trace};

/// (headers, query parameters)
type PreparedRequest = (Vec<(String, String)>, Vec<(String, String)>);

/// REST client trait for making exchange requests
///
/// Implementations own transport, signing, endpoint routing and retry
/// execution. Failures that survive the retry policy surface as an error whose
/// message is either a transport description or `signedRequest error: `
/// followed by the exchange's raw error body.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Perform one logical call, retrying transient failures internally
    ///
    /// # Arguments
    /// * `call` - Endpoint root and path, method, parameters and signing flag
    ///
    /// # Returns
    /// The response body decoded into a [`Reply`]
    async fn signed_request(&self, call: &RemoteCall) -> Result<Reply, ExchangeError>;
}

#[async_trait]
impl<R: RestClient + ?Sized> RestClient for Arc<R> {
    async fn signed_request(&self, call: &RemoteCall) -> Result<Reply, ExchangeError> {
        (**self).signed_request(call).await
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Endpoint roots for the selected deployment
    pub endpoints: Endpoints,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            exchange_name: "binance".to_string(),
            timeout_seconds: 30,
            retry: RetryPolicy::default(),
            user_agent: "binance-guard/0.1".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    fn get_timestamp() -> Result<u64, ExchangeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| ExchangeError::Other(format!("Failed to get timestamp: {}", e)))
    }

    /// Headers and query parameters for one attempt, signed when the call requires it
    fn prepare(&self, call: &RemoteCall) -> Result<PreparedRequest, ExchangeError> {
        let unsigned = || {
            call.params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
        };

        if !call.signed {
            return Ok((Vec::new(), unsigned()));
        }

        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::AuthError("Authentication required but no signer provided".to_string())
        })?;

        let (headers, signed_params) = signer.sign_request(
            call.method.as_str(),
            &call.endpoint,
            &call.query_string(),
            Self::get_timestamp()?,
        )?;

        let params = if signed_params.is_empty() {
            unsigned()
        } else {
            signed_params
        };

        Ok((headers.into_iter().collect(), params))
    }

    /// Phrase reqwest failures with the fragments the retry classifier knows
    fn describe_send_error(e: &reqwest::Error) -> ExchangeError {
        if e.is_timeout() {
            ExchangeError::NetworkError(format!("Operation timed out: {}", e))
        } else if e.is_connect() {
            ExchangeError::NetworkError(format!("Failed to connect: {}", e))
        } else if e.is_request() && e.status().is_none() {
            // connection dropped before any response line arrived
            ExchangeError::NetworkError(format!("Empty reply from server: {}", e))
        } else {
            ExchangeError::NetworkError(format!("Request failed: {}", e))
        }
    }

    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Reply, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            Reply::from_body(&response_text).map_err(|e| {
                ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
            })
        } else if response_text.trim().is_empty() {
            Err(ExchangeError::NetworkError(format!(
                "Server returned nothing (HTTP {})",
                status.as_u16()
            )))
        } else {
            Err(ExchangeError::SignedRequest(response_text))
        }
    }

    /// One attempt, no retries
    async fn attempt(&self, call: &RemoteCall) -> Result<Reply, ExchangeError> {
        let url = self.config.endpoints.url(call.root, &call.endpoint);
        let (headers, params) = self.prepare(call)?;

        let mut request = self.client.request(call.method.into(), &url).query(&params);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::describe_send_error(&e))?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, call), fields(exchange = %self.config.exchange_name, method = %call.method, endpoint = %call.endpoint, signed = call.signed))]
    async fn signed_request(&self, call: &RemoteCall) -> Result<Reply, ExchangeError> {
        let mut attempt_no = 0_u32;
        RetryIf::spawn(
            self.config.retry.backoff(),
            || {
                attempt_no += 1;
                debug!(attempt = attempt_no, "Sending request");
                self.attempt(call)
            },
            |e: &ExchangeError| {
                let retry = is_retryable(&e.to_string());
                if retry {
                    debug!(error = %e, "Transient failure, retrying");
                }
                retry
            },
        )
        .await
    }
}
