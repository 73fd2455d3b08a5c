#![allow(dead_code)]

use async_trait::async_trait;
use binance_guard::core::kernel::RestClient;
use binance_guard::{BinanceClient, Endpoints, ExchangeError, RemoteCall, Reply};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted transport: hands out queued outcomes in order and records calls.
#[derive(Default)]
pub struct MockRest {
    outcomes: Mutex<VecDeque<Result<Reply, ExchangeError>>>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl MockRest {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, value: Value) -> &Self {
        self.push(Ok(Reply::decode(value)))
    }

    pub fn fail(&self, error: ExchangeError) -> &Self {
        self.push(Err(error))
    }

    pub fn push(&self, outcome: Result<Reply, ExchangeError>) -> &Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn signed_request(&self, call: &RemoteCall) -> Result<Reply, ExchangeError> {
        self.calls.lock().unwrap().push(call.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Reply::Empty))
    }
}

pub fn client(mock: &Arc<MockRest>) -> BinanceClient<Arc<MockRest>> {
    BinanceClient::new(Arc::clone(mock), Endpoints::production())
}

pub fn signed_request_error(body: &str) -> ExchangeError {
    ExchangeError::SignedRequest(body.to_string())
}
