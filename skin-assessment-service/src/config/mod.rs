use crate::models::SkinProfile;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Whole-body upload limit (20MB) covering all three photos.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_ANTHROPIC_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    pub common: core_config::Config,
    pub anthropic: AnthropicConfig,
    pub backend: BackendConfig,
    pub assessment: AssessmentSettings,
}

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Backend project the service is provisioned against (URL + service role key).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub service_role_key: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct AssessmentSettings {
    pub max_upload_bytes: usize,
    /// Concern and skin type used when the request does not supply them.
    pub default_profile: SkinProfile,
    /// Read `concern` / `skin_type` form fields from the request.
    pub accept_form_profile: bool,
}

impl AssessmentConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Ok(level) = env::var("LOG_LEVEL") {
            common_config.log_level = level;
        }
        if let Ok(endpoint) = env::var("OTLP_ENDPOINT") {
            common_config.otlp_endpoint = Some(endpoint);
        }

        Ok(AssessmentConfig {
            common: common_config,
            anthropic: AnthropicConfig {
                api_key: Secret::new(get_env("ANTHROPIC_API_KEY", None, is_prod)?),
                base_url: get_env(
                    "ANTHROPIC_BASE_URL",
                    Some(DEFAULT_ANTHROPIC_BASE_URL),
                    is_prod,
                )?,
                model: get_env("ANTHROPIC_MODEL", Some(DEFAULT_ANTHROPIC_MODEL), is_prod)?,
                timeout_secs: get_env_parsed(
                    "ANTHROPIC_TIMEOUT_SECS",
                    DEFAULT_ANTHROPIC_TIMEOUT_SECS,
                    is_prod,
                )?,
            },
            backend: BackendConfig {
                url: get_env("SUPABASE_URL", None, is_prod)?,
                service_role_key: Secret::new(get_env("SUPABASE_SERVICE_ROLE_KEY", None, is_prod)?),
            },
            assessment: AssessmentSettings {
                max_upload_bytes: get_env_parsed(
                    "ASSESSMENT_MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                    is_prod,
                )?,
                default_profile: SkinProfile::new(
                    get_env("ASSESSMENT_DEFAULT_CONCERN", Some("acne"), is_prod)?,
                    get_env("ASSESSMENT_DEFAULT_SKIN_TYPE", Some("normal"), is_prod)?,
                ),
                accept_form_profile: get_env_parsed(
                    "ASSESSMENT_ACCEPT_FORM_PROFILE",
                    false,
                    is_prod,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn get_env_parsed<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr + ToString,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(&default.to_string()), is_prod)?
        .trim()
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("Invalid {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_uses_default_outside_prod() {
        let value = get_env("SKIN_ASSESSMENT_TEST_UNSET_A", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_env_required_in_prod() {
        let err = get_env("SKIN_ASSESSMENT_TEST_UNSET_B", Some("fallback"), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn test_get_env_required_without_default() {
        assert!(get_env("SKIN_ASSESSMENT_TEST_UNSET_C", None, false).is_err());
    }

    #[test]
    fn test_get_env_parsed_default() {
        let limit: usize =
            get_env_parsed("SKIN_ASSESSMENT_TEST_UNSET_D", DEFAULT_MAX_UPLOAD_BYTES, false)
                .unwrap();
        assert_eq!(limit, DEFAULT_MAX_UPLOAD_BYTES);
        let flag: bool = get_env_parsed("SKIN_ASSESSMENT_TEST_UNSET_E", false, false).unwrap();
        assert!(!flag);
    }
}
