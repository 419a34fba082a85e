//! Image generation backend.
//!
//! Calls an OpenAI-compatible `/images/generations` endpoint and turns the
//! first returned image into a reference the display surface can show
//! directly: base64 payloads become `data:image/png;base64,...` URIs, and
//! hosted images are passed through as URLs.

use serde_json::{Value, json};

use crate::config::ImageBackendConfig;
use crate::error::EnrichError;
use crate::http::{Auth, post_json};

/// Landscape frame for the portrait.
const IMAGE_SIZE: &str = "1536x1024";

/// Renders universe portraits.
#[derive(Debug)]
pub struct ImageBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ImageBackend {
    /// Create a backend sharing `client` with the text backend.
    pub fn new(client: reqwest::Client, config: &ImageBackendConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}/images/generations", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Model identifier for logging.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render `prompt` and return an image reference.
    ///
    /// Returns `Ok(None)` when the API answers without image data.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>, EnrichError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": IMAGE_SIZE
        });
        let response = post_json(
            &self.client,
            "images/generations",
            &self.endpoint,
            Auth::Bearer(&self.api_key),
            &body,
        )
        .await?;
        Ok(extract_image_reference(&response))
    }
}

/// Extract `data[0].b64_json` (as a data URI) or `data[0].url`.
fn extract_image_reference(response: &Value) -> Option<String> {
    let first = response.pointer("/data/0")?;

    if let Some(b64) = first
        .get("b64_json")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
    {
        return Some(format!("data:image/png;base64,{}", b64.trim()));
    }

    first
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_generations_path() {
        let backend = ImageBackend::new(
            reqwest::Client::new(),
            &ImageBackendConfig {
                api_url: "https://img.test/v1/".to_owned(),
                api_key: "k".to_owned(),
                model: "gpt-image-1".to_owned(),
            },
        );
        assert_eq!(backend.endpoint, "https://img.test/v1/images/generations");
        assert_eq!(backend.model(), "gpt-image-1");
    }

    #[test]
    fn base64_payload_becomes_data_uri() {
        let json = serde_json::json!({"data": [{"b64_json": "iVBORw0KGgo="}]});
        assert_eq!(
            extract_image_reference(&json).as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn hosted_url_passes_through() {
        let json = serde_json::json!({"data": [{"url": "https://cdn.test/u.png"}]});
        assert_eq!(
            extract_image_reference(&json).as_deref(),
            Some("https://cdn.test/u.png")
        );
    }

    #[test]
    fn empty_image_data_is_none() {
        assert!(extract_image_reference(&serde_json::json!({"data": [{"b64_json": ""}]})).is_none());
        assert!(extract_image_reference(&serde_json::json!({"data": []})).is_none());
    }
}
