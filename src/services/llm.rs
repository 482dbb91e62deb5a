//! Thin wrapper over the chat-completion API.
//!
//! One request per call, no retries: a failed completion is an error the
//! caller turns into a user-facing apology.

use anyhow::{anyhow, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_openai::Client;

#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    /// Single completion returning the raw text of the first choice.
    pub async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        self.request(system, user, temperature, false).await
    }

    /// Single completion in JSON mode; the model is constrained to return a
    /// JSON object, which the caller deserializes.
    pub async fn complete_json(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        self.request(system, user, temperature, true).await
    }

    async fn request(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        json_mode: bool,
    ) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(temperature);
        if json_mode {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let request = builder.build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("Completion returned no choices"))
    }
}
