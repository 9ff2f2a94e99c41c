//! Client for the backend project the service is provisioned against.
//!
//! Built once at startup from the project URL and service role key. The
//! assessment flow does not touch it; readiness probes use it to confirm
//! the backend is reachable.

use crate::config::BackendConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use service_core::observability::TracedClientExt;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend client could not be built: {0}")]
    Client(String),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend returned {0}")]
    Unhealthy(u16),
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Any response below 500 from the REST root counts as reachable.
    pub async fn health_check(&self) -> Result<(), BackendError> {
        let key = self.config.service_role_key.expose_secret();
        let url = format!("{}/rest/v1/", self.config.url.trim_end_matches('/'));

        let response = self
            .client
            .traced_get(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        if response.status().is_server_error() {
            return Err(BackendError::Unhealthy(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(url: &str) -> BackendClient {
        BackendClient::new(BackendConfig {
            url: url.to_string(),
            service_role_key: Secret::new("service-key".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_health_check_sends_service_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client(&server.uri()).health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_client_errors_count_as_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client(&server.uri()).health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server.uri()).health_check().await,
            Err(BackendError::Unhealthy(503))
        ));
    }
}
