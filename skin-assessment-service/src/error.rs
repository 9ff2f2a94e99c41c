//! Failures of a single assessment request and their HTTP mapping.

use crate::models::UploadError;
use crate::services::encoding::EncodingError;
use crate::services::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Malformed multipart body: {0}")]
    MalformedForm(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Upstream call failed: {0}")]
    Provider(#[from] ProviderError),
}

impl AssessmentError {
    /// Label for the `assessments_total` counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            AssessmentError::Upload(UploadError::MissingFile) => "missing_file",
            AssessmentError::Upload(UploadError::InvalidFileType) => "invalid_file_type",
            AssessmentError::MalformedForm(_) => "malformed_form",
            AssessmentError::PayloadTooLarge(_) => "payload_too_large",
            AssessmentError::Encoding(_) => "encoding_failed",
            AssessmentError::Provider(e) => e.kind(),
        }
    }
}

impl From<AssessmentError> for AppError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::Upload(e) => AppError::BadRequest(anyhow::anyhow!("{}", e)),
            AssessmentError::MalformedForm(_) => {
                AppError::BadRequest(anyhow::anyhow!("Malformed multipart body"))
            }
            AssessmentError::PayloadTooLarge(_) => {
                AppError::PayloadTooLarge("Upload too large".to_string())
            }
            AssessmentError::Encoding(_) => {
                AppError::UnprocessableEntity(anyhow::anyhow!("Failed to encode image"))
            }
            AssessmentError::Provider(e) => match e {
                ProviderError::RateLimited { retry_after } => {
                    AppError::TooManyRequests("Upstream rate limited".to_string(), retry_after)
                }
                ProviderError::Timeout => {
                    AppError::GatewayTimeout("Upstream request timed out".to_string())
                }
                ProviderError::Unauthorized { .. } => {
                    AppError::BadGateway("upstream rejected credentials".to_string())
                }
                ProviderError::NotConfigured(_) => {
                    AppError::ServiceUnavailable("assessment provider not configured".to_string())
                }
                ProviderError::ApiError { status, .. } => {
                    AppError::BadGateway(format!("upstream returned {}", status))
                }
                ProviderError::NetworkError(_) => {
                    AppError::BadGateway("upstream unreachable".to_string())
                }
                ProviderError::InvalidResponse(_) => {
                    AppError::BadGateway("invalid upstream response".to_string())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status(err: AssessmentError) -> StatusCode {
        AppError::from(err).status_code()
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(
            status(UploadError::MissingFile.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(UploadError::InvalidFileType.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AssessmentError::MalformedForm("boundary".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_messages_are_fixed() {
        let err = AppError::from(AssessmentError::from(UploadError::MissingFile));
        assert_eq!(err.to_string(), "Bad request: No file provided");
        let err = AppError::from(AssessmentError::from(UploadError::InvalidFileType));
        assert_eq!(err.to_string(), "Bad request: Invalid file type");
    }

    #[test]
    fn test_upstream_errors_are_distinguished() {
        assert_eq!(
            status(ProviderError::RateLimited { retry_after: None }.into()),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status(ProviderError::Timeout.into()),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(
                ProviderError::ApiError {
                    status: 500,
                    body: String::new()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(ProviderError::Unauthorized { status: 401 }.into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            AssessmentError::from(UploadError::MissingFile).outcome(),
            "missing_file"
        );
        assert_eq!(
            AssessmentError::from(ProviderError::Timeout).outcome(),
            "timeout"
        );
    }
}
