//! Multimodal completion providers.
//!
//! The assessment handler talks to a provider through a trait so the
//! Anthropic backend can be swapped for the recording mock in tests.

pub mod anthropic;
pub mod mock;

use crate::models::MessagesRequest;
use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use mock::MockProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Rate limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("Upstream rejected credentials ({status})")]
    Unauthorized { status: u16 },

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Unauthorized { .. } => "unauthorized",
            ProviderError::ApiError { .. } => "api_error",
            ProviderError::Timeout => "timeout",
            ProviderError::NetworkError(_) => "network",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// A multimodal completion backend.
#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send one Messages API request and return the response object as-is.
    async fn create_message(
        &self,
        request: &MessagesRequest,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
