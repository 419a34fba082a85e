//! Text backend for universe profiles.
//!
//! A profile is one request to either an OpenAI-compatible
//! `/chat/completions` endpoint or the Anthropic `/messages` endpoint. The
//! two [`Dialect`]s differ in three places only: where the system prompt
//! goes, whether a sampling seed and JSON mode can be requested, and where
//! the reply text sits in the response. Transport lives in
//! [`crate::http`].

use multiverse_types::Seed;
use serde_json::{Value, json};

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::EnrichError;
use crate::http::{Auth, post_json};
use crate::prompt::RenderedPrompt;

/// Upper bound on profile length. Four short fields fit comfortably.
const MAX_TOKENS: u32 = 1024;

/// Sampling temperature for chat completions.
const TEMPERATURE: f64 = 0.9;

/// Request and response shape of a text API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `POST {api_url}/chat/completions`, bearer auth, JSON mode, seeded.
    ChatCompletions,
    /// `POST {api_url}/messages`, `x-api-key` auth, top-level system prompt.
    Messages,
}

impl Dialect {
    const fn path(self) -> &'static str {
        match self {
            Self::ChatCompletions => "chat/completions",
            Self::Messages => "messages",
        }
    }

    /// Build the request body. Only chat completions accept the seed.
    fn request_body(self, model: &str, prompt: &RenderedPrompt, seed: Seed) -> Value {
        match self {
            Self::ChatCompletions => json!({
                "model": model,
                "messages": [
                    {"role": "system", "content": prompt.system},
                    {"role": "user", "content": prompt.user}
                ],
                "temperature": TEMPERATURE,
                "max_tokens": MAX_TOKENS,
                "seed": seed.value(),
                "response_format": {"type": "json_object"}
            }),
            Self::Messages => json!({
                "model": model,
                "max_tokens": MAX_TOKENS,
                "system": prompt.system,
                "messages": [{"role": "user", "content": prompt.user}]
            }),
        }
    }

    /// Pull the reply text out of a decoded response.
    fn reply_text(self, response: &Value) -> Result<String, EnrichError> {
        let (text, location) = match self {
            Self::ChatCompletions => (
                response.pointer("/choices/0/message/content"),
                "choices[0].message.content",
            ),
            Self::Messages => (response.pointer("/content/0/text"), "content[0].text"),
        };
        text.and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| EnrichError::LlmBackend(format!("{} reply has no {location}", self.path())))
    }
}

impl From<&BackendType> for Dialect {
    fn from(backend: &BackendType) -> Self {
        match backend {
            BackendType::OpenAi => Self::ChatCompletions,
            BackendType::Anthropic => Self::Messages,
        }
    }
}

/// The configured text backend.
#[derive(Debug)]
pub struct LlmBackend {
    client: reqwest::Client,
    dialect: Dialect,
    endpoint: String,
    api_key: String,
    model: String,
}

impl LlmBackend {
    /// Create a backend sharing `client` with the rest of the enricher.
    pub fn new(client: reqwest::Client, config: &LlmBackendConfig) -> Self {
        let dialect = Dialect::from(&config.backend_type);
        Self {
            client,
            dialect,
            endpoint: format!("{}/{}", config.api_url.trim_end_matches('/'), dialect.path()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send the profile prompt and return the raw reply text.
    ///
    /// `seed` is forwarded as a sampling seed where the API accepts one, so
    /// repeated requests for one universe tend to read alike.
    pub async fn complete(&self, prompt: &RenderedPrompt, seed: Seed) -> Result<String, EnrichError> {
        let body = self.dialect.request_body(&self.model, prompt, seed);
        let auth = match self.dialect {
            Dialect::ChatCompletions => Auth::Bearer(&self.api_key),
            Dialect::Messages => Auth::AnthropicKey(&self.api_key),
        };
        let response = post_json(&self.client, self.dialect.path(), &self.endpoint, auth, &body).await?;
        self.dialect.reply_text(&response)
    }

    /// Provider family, for logging.
    pub const fn name(&self) -> &'static str {
        match self.dialect {
            Dialect::ChatCompletions => "openai-compatible",
            Dialect::Messages => "anthropic",
        }
    }

    /// Model identifier, for logging.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prompt() -> RenderedPrompt {
        RenderedPrompt {
            system: "You chart parallel worlds.".to_owned(),
            user: "Describe Dimension #1000.".to_owned(),
        }
    }

    fn config(backend_type: BackendType) -> LlmBackendConfig {
        LlmBackendConfig {
            backend_type,
            api_url: "https://llm.test/v1/".to_owned(),
            api_key: "test".to_owned(),
            model: "test-model".to_owned(),
        }
    }

    #[test]
    fn chat_completions_request_is_seeded_json_mode() {
        let body = Dialect::ChatCompletions.request_body("m", &prompt(), Seed::new(1000));
        assert_eq!(body["seed"], 1000);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Describe Dimension #1000.");
    }

    #[test]
    fn messages_request_hoists_the_system_prompt() {
        let body = Dialect::Messages.request_body("m", &prompt(), Seed::new(1000));
        assert_eq!(body["system"], "You chart parallel worlds.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("seed").is_none());
    }

    #[test]
    fn reply_text_per_dialect() {
        let chat = json!({"choices": [{"message": {"content": "{\"location\": \"Rim\"}"}}]});
        assert!(Dialect::ChatCompletions.reply_text(&chat).unwrap().contains("Rim"));

        let messages = json!({"content": [{"type": "text", "text": "{\"description\": \"Mist.\"}"}]});
        assert!(Dialect::Messages.reply_text(&messages).unwrap().contains("Mist."));
    }

    #[test]
    fn missing_reply_text_names_the_field() {
        let err = Dialect::Messages.reply_text(&json!({"content": []})).unwrap_err();
        assert!(err.to_string().contains("content[0].text"));
        assert!(Dialect::ChatCompletions.reply_text(&json!({"error": "quota"})).is_err());
    }

    #[test]
    fn endpoint_follows_the_backend_type() {
        let chat = LlmBackend::new(reqwest::Client::new(), &config(BackendType::OpenAi));
        assert_eq!(chat.endpoint(), "https://llm.test/v1/chat/completions");
        assert_eq!(chat.name(), "openai-compatible");
        assert_eq!(chat.model(), "test-model");

        let messages = LlmBackend::new(reqwest::Client::new(), &config(BackendType::Anthropic));
        assert_eq!(messages.endpoint(), "https://llm.test/v1/messages");
        assert_eq!(messages.name(), "anthropic");
    }
}
