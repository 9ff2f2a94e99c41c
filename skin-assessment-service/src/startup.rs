//! Application startup and lifecycle management.
//!
//! Clients are built once here and shared with every request through
//! `AppState`.

use crate::config::AssessmentConfig;
use crate::handlers;
use crate::services::{AnthropicProvider, AssessmentProvider, BackendClient};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use service_core::observability::init_metrics;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AssessmentConfig,
    pub backend: BackendClient,
    pub provider: Arc<dyn AssessmentProvider>,
}

impl AppState {
    /// Construct the production clients from configuration.
    pub fn from_config(config: AssessmentConfig) -> Result<Self, AppError> {
        let backend = BackendClient::new(config.backend.clone()).map_err(|e| {
            tracing::error!("Failed to initialize backend client: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e))
        })?;
        tracing::info!(url = %backend.url(), "Initialized backend client");

        let provider = AnthropicProvider::new(config.anthropic.clone()).map_err(|e| {
            tracing::error!("Failed to initialize Anthropic provider: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e))
        })?;
        tracing::info!(
            model = %config.anthropic.model,
            timeout_secs = config.anthropic.timeout_secs,
            "Initialized Anthropic provider"
        );

        Ok(Self {
            config,
            backend,
            provider: Arc::new(provider),
        })
    }
}

/// Build the HTTP router. The upload limit applies to the assessment routes only.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config.assessment.max_upload_bytes;

    Router::new()
        .route("/", post(handlers::create_assessment))
        .route("/assessments", post(handlers::create_assessment))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AssessmentConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Build around pre-constructed state (e.g. a mock provider).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        init_metrics();

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Skin assessment service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
