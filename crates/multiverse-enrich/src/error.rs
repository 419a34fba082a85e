//! Error types for the enrichment collaborator.
//!
//! Uses `thiserror` for typed errors that surface through the enrichment
//! pipeline: configuration, prompt rendering, LLM calls, payload recovery.
//! At the core boundary every variant collapses into an
//! [`EnrichmentFailure`].

use multiverse_core::enricher::EnrichmentFailure;

/// Errors that can occur while enriching a universe.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// An LLM or image backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The response could not be recovered into an overlay.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<EnrichError> for EnrichmentFailure {
    fn from(err: EnrichError) -> Self {
        match err {
            EnrichError::Config(reason) => Self::MissingCredentials(reason),
            EnrichError::Template(reason) => Self::Unavailable(reason),
            EnrichError::LlmBackend(reason) => Self::Transport(reason),
            EnrichError::Parse(reason) => Self::MalformedPayload(reason),
            EnrichError::Serde(e) => Self::MalformedPayload(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_become_malformed_payloads() {
        let failure = EnrichmentFailure::from(EnrichError::Parse("no object".to_owned()));
        assert_eq!(
            failure,
            EnrichmentFailure::MalformedPayload("no object".to_owned())
        );
    }

    #[test]
    fn config_errors_become_missing_credentials() {
        let failure = EnrichmentFailure::from(EnrichError::Config("ENRICH_API_KEY".to_owned()));
        assert!(matches!(failure, EnrichmentFailure::MissingCredentials(_)));
    }
}
