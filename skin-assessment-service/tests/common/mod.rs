#![allow(dead_code)]

use secrecy::Secret;
use skin_assessment_service::config::{
    AnthropicConfig, AssessmentConfig, AssessmentSettings, BackendConfig,
};
use skin_assessment_service::models::SkinProfile;
use skin_assessment_service::startup::Application;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-anthropic-key";
pub const TEST_SERVICE_KEY: &str = "test-service-role-key";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Stands in for the Anthropic API.
    pub upstream: MockServer,
    /// Stands in for the backend project.
    pub backend: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let upstream = MockServer::start().await;
        let backend = MockServer::start().await;

        let mut common = service_core::config::Config::default();
        common.port = 0; // Random port

        let config = AssessmentConfig {
            common,
            anthropic: AnthropicConfig {
                api_key: Secret::new(TEST_API_KEY.to_string()),
                base_url: upstream.uri(),
                model: "claude-3-5-sonnet-20241022".to_string(),
                timeout_secs: 5,
            },
            backend: BackendConfig {
                url: backend.uri(),
                service_role_key: Secret::new(TEST_SERVICE_KEY.to_string()),
            },
            assessment: AssessmentSettings {
                max_upload_bytes: 20 * 1024 * 1024,
                default_profile: SkinProfile::new("acne", "normal"),
                accept_form_profile: false,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped(std::future::pending()).await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            upstream,
            backend,
        }
    }
}

/// JPEG-looking payload of exactly `size` bytes.
pub fn jpeg(size: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(size, 0x5A);
    data
}

pub fn image_part(name: &str, size: usize) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(jpeg(size))
        .file_name(format!("{}.jpg", name))
        .mime_str("image/jpeg")
        .unwrap()
}
