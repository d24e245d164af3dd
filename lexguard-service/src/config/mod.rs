use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default chat model used for both generation and checking.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default base URL of the OpenAI REST API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct LexguardConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub provider: ProviderKind,
    pub cors: CorsConfig,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
}

/// Which completion backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    /// Canned responses, no network access. For local development.
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown LEXGUARD_PROVIDER '{}', expected 'openai' or 'mock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfig {
    /// Any origin, method and header. Development posture.
    Permissive,
    AllowList(Vec<String>),
}

impl CorsConfig {
    /// Parse a comma-separated origin list; `*` (or nothing) means permissive.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsConfig::Permissive
        } else {
            CorsConfig::AllowList(origins)
        }
    }
}

impl LexguardConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service settings from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let provider: ProviderKind = get("LEXGUARD_PROVIDER", Some("openai"))?.parse()?;
        if provider == ProviderKind::Mock && is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "LEXGUARD_PROVIDER=mock is not allowed in production"
            )));
        }

        let api_key = match provider {
            ProviderKind::OpenAi => get("OPENAI_API_KEY", None)?,
            ProviderKind::Mock => lookup("OPENAI_API_KEY").unwrap_or_default(),
        };

        Ok(LexguardConfig {
            common,
            openai: OpenAiConfig {
                api_key: Secret::new(api_key),
                model: get("OPENAI_MODEL", Some(DEFAULT_MODEL))?,
                base_url: get("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL))?
                    .trim_end_matches('/')
                    .to_string(),
            },
            provider,
            cors: CorsConfig::parse(&get("CORS_ALLOWED_ORIGINS", Some("*"))?),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }
}

/// Variables with a default are still mandatory in production.
fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
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

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<LexguardConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LexguardConfig::from_lookup(core_config::Config::default(), |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn dev_defaults_apply() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.openai.model, DEFAULT_MODEL);
        assert_eq!(config.openai.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.openai.api_key.expose_secret(), "sk-test");
        assert_eq!(config.cors, CorsConfig::Permissive);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn api_key_required_for_openai() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn mock_provider_needs_no_api_key() {
        let config = load(&[("LEXGUARD_PROVIDER", "mock")]).unwrap();
        assert_eq!(config.provider, ProviderKind::Mock);
    }

    #[test]
    fn mock_provider_rejected_in_prod() {
        assert!(load(&[("ENVIRONMENT", "prod"), ("LEXGUARD_PROVIDER", "mock")]).is_err());
    }

    #[test]
    fn prod_requires_explicit_settings() {
        let err = load(&[("ENVIRONMENT", "prod"), ("OPENAI_API_KEY", "sk")]).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
        ])
        .unwrap();
        assert_eq!(config.openai.base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let config = load(&[("OPENAI_API_KEY", "sk-very-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn cors_origin_lists() {
        assert_eq!(CorsConfig::parse("*"), CorsConfig::Permissive);
        assert_eq!(CorsConfig::parse(""), CorsConfig::Permissive);
        assert_eq!(
            CorsConfig::parse("https://a.example, https://b.example"),
            CorsConfig::AllowList(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(load(&[("LEXGUARD_PROVIDER", "gemini")]).is_err());
    }
}
