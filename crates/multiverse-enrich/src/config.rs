//! Configuration types for the enrichment collaborator.
//!
//! All configuration is loaded from environment variables. The enricher
//! needs to know which text backend to call (URL, API key, model), and
//! optionally which image backend renders the universe's portrait.

use std::time::Duration;

use crate::error::EnrichError;

/// Default enrichment deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Complete enrichment configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Text backend producing the universe profile.
    pub text_backend: LlmBackendConfig,
    /// Image backend, if configured.
    pub image_backend: Option<ImageBackendConfig>,
    /// Directory with template overrides. Embedded templates fill the gaps.
    pub templates_dir: Option<String>,
    /// Maximum time allowed for one enrichment round trip.
    pub timeout: Duration,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type (openai, anthropic).
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Configuration for the OpenAI-compatible image backend.
#[derive(Debug, Clone)]
pub struct ImageBackendConfig {
    /// Base API URL. Requests go to `{api_url}/images/generations`.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Image model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as it appears in `ENRICH_BACKEND`.
    pub fn parse(name: &str) -> Result<Self, EnrichError> {
        match name.to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(EnrichError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

impl EnrichConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `ENRICH_BACKEND` -- text backend type
    /// - `ENRICH_API_URL` -- text API base URL
    /// - `ENRICH_API_KEY` -- text API key
    /// - `ENRICH_MODEL` -- text model name
    ///
    /// Optional variables:
    /// - `ENRICH_IMAGE_API_URL` -- image API base URL (enables imagery)
    /// - `ENRICH_IMAGE_API_KEY` -- image API key (defaults to `ENRICH_API_KEY`)
    /// - `ENRICH_IMAGE_MODEL` -- image model name (default `gpt-image-1`)
    /// - `ENRICH_TEMPLATES_DIR` -- directory with template overrides
    /// - `ENRICH_TIMEOUT_MS` -- enrichment deadline in milliseconds (default 60000)
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnrichError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| EnrichError::Config(format!("missing required env var {name}")))
        };

        let text_backend = LlmBackendConfig {
            backend_type: BackendType::parse(&required("ENRICH_BACKEND")?)?,
            api_url: required("ENRICH_API_URL")?,
            api_key: required("ENRICH_API_KEY")?,
            model: required("ENRICH_MODEL")?,
        };

        let image_backend = lookup("ENRICH_IMAGE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|api_url| ImageBackendConfig {
                api_url,
                api_key: lookup("ENRICH_IMAGE_API_KEY")
                    .unwrap_or_else(|| text_backend.api_key.clone()),
                model: lookup("ENRICH_IMAGE_MODEL").unwrap_or_else(|| "gpt-image-1".to_owned()),
            });

        let timeout_ms: u64 = match lookup("ENRICH_TIMEOUT_MS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| EnrichError::Config(format!("invalid ENRICH_TIMEOUT_MS: {e}")))?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            return Err(EnrichError::Config(
                "ENRICH_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            text_backend,
            image_backend,
            templates_dir: lookup("ENRICH_TEMPLATES_DIR"),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        vars(&[
            ("ENRICH_BACKEND", "openai"),
            ("ENRICH_API_URL", "https://api.openai.com/v1"),
            ("ENRICH_API_KEY", "sk-test"),
            ("ENRICH_MODEL", "gpt-4o-mini"),
        ])
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let env = base();
        let config = EnrichConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.text_backend.backend_type, BackendType::OpenAi);
        assert!(config.image_backend.is_none());
        assert!(config.templates_dir.is_none());
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let mut env = base();
        env.remove("ENRICH_API_KEY");
        let result = EnrichConfig::from_lookup(|k| env.get(k).cloned());
        assert!(matches!(result, Err(EnrichError::Config(_))));
    }

    #[test]
    fn image_backend_inherits_text_key() {
        let mut env = base();
        env.insert("ENRICH_IMAGE_API_URL".to_owned(), "https://img.test/v1".to_owned());
        let config = EnrichConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        let image = config.image_backend.unwrap();
        assert_eq!(image.api_key, "sk-test");
        assert_eq!(image.model, "gpt-image-1");
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(BackendType::parse("Claude").unwrap(), BackendType::Anthropic);
        assert_eq!(BackendType::parse("ollama").unwrap(), BackendType::OpenAi);
        assert!(BackendType::parse("carrier-pigeon").is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut env = base();
        env.insert("ENRICH_TIMEOUT_MS".to_owned(), "0".to_owned());
        assert!(EnrichConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }
}
