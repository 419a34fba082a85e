//! One JSON POST for every provider endpoint this crate talks to.
//!
//! The chat completions, messages, and image generation endpoints differ
//! in auth headers and body shape, not in transport. All three go through
//! [`post_json`], so a failure reads the same whichever endpoint produced
//! it: `<service> request failed`, `<service> returned <status>`, or
//! `<service> sent an unreadable body`.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::EnrichError;

/// `anthropic-version` header sent with every Messages API call.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Error bodies are quoted up to this many characters.
const ERROR_BODY_LIMIT: usize = 512;

/// How a request authenticates.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    /// `Authorization: Bearer <key>` (OpenAI-compatible APIs).
    Bearer(&'a str),
    /// `x-api-key: <key>` plus the pinned `anthropic-version`.
    AnthropicKey(&'a str),
}

/// POST `body` to `url` and return the decoded JSON response.
///
/// `service` names the endpoint in error messages.
pub(crate) async fn post_json(
    client: &reqwest::Client,
    service: &str,
    url: &str,
    auth: Auth<'_>,
    body: &Value,
) -> Result<Value, EnrichError> {
    let request = client.post(url).json(body);
    let request = match auth {
        Auth::Bearer(key) => request.bearer_auth(key),
        Auth::AnthropicKey(key) => request
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION),
    };

    let response = request
        .send()
        .await
        .map_err(|e| EnrichError::LlmBackend(format!("{service} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(service, status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| EnrichError::LlmBackend(format!("{service} sent an unreadable body: {e}")))
}

fn status_error(service: &str, status: StatusCode, body: &str) -> EnrichError {
    let quoted: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if quoted.is_empty() {
        EnrichError::LlmBackend(format!("{service} returned {status}"))
    } else {
        EnrichError::LlmBackend(format!("{service} returned {status}: {quoted}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_error_quotes_a_bounded_body() {
        let long = "x".repeat(2_000);
        let message = status_error("images", StatusCode::TOO_MANY_REQUESTS, &long).to_string();
        assert!(message.starts_with("LLM backend error: images returned 429 Too Many Requests: x"));
        assert!(message.len() < 600);
    }

    #[test]
    fn status_error_without_body() {
        let err = status_error("messages", StatusCode::UNAUTHORIZED, "  ");
        assert_eq!(err.to_string(), "LLM backend error: messages returned 401 Unauthorized");
    }

    #[tokio::test]
    async fn refused_connection_names_the_service() {
        // Nothing listens on the discard port on loopback.
        let err = post_json(
            &reqwest::Client::new(),
            "chat completions",
            "http://127.0.0.1:9/v1/chat/completions",
            Auth::Bearer("test"),
            &serde_json::json!({}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("chat completions request failed"));
    }
}
