//! Recording mock provider for tests.

use super::{AssessmentProvider, ProviderError};
use crate::models::MessagesRequest;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn() -> Result<serde_json::Value, ProviderError> + Send + Sync>;

/// Mock provider that records every request and replies with a canned result.
pub struct MockProvider {
    responder: Responder,
    requests: Mutex<Vec<MessagesRequest>>,
}

impl MockProvider {
    /// Reply to every request with `response`.
    pub fn new(response: serde_json::Value) -> Self {
        Self::with_responder(move || Ok(response.clone()))
    }

    /// Fail every request with the error built by `make_error`.
    pub fn failing(make_error: fn() -> ProviderError) -> Self {
        Self::with_responder(move || Err(make_error()))
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn() -> Result<serde_json::Value, ProviderError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copies of the requests received so far.
    pub fn requests(&self) -> Vec<MessagesRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AssessmentProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_message(
        &self,
        request: &MessagesRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        (self.responder)()
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
