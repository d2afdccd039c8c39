use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::VisionService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1200;
pub const DEFAULT_ANALYSIS_LEVEL: u32 = 1;

/// Sends cadastral maps to an OpenAI vision model for boundary analysis.
pub struct OpenAiVisionClient {
    http: OpenAiHttpClient,
    model: String,
    max_tokens: u32,
    analysis_level: u32,
}

impl OpenAiVisionClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, timeout, client),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            analysis_level: DEFAULT_ANALYSIS_LEVEL,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_analysis_level(mut self, analysis_level: u32) -> Self {
        self.analysis_level = analysis_level;
        self
    }

    /// Build the system + user exchange for one image.
    pub fn build_request(&self, data_url: &str) -> ChatCompletionRequest {
        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(
                prompts::DETECTION_SYSTEM.trim().to_string(),
            )),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::Parts(vec![
                MessagePart::text(prompts::DETECTION_USER.trim()),
                MessagePart::image_url(data_url),
                MessagePart::text(prompts::analysis_level(self.analysis_level)),
            ])),
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl VisionService for OpenAiVisionClient {
    async fn detect_constructions(&self, data_url: &str) -> Result<String> {
        tracing::debug!(
            "Requesting construction analysis from {} ({} chars of image data)",
            self.model,
            data_url.len()
        );

        let request = self.build_request(data_url);
        let response = self.http.chat_completion(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No choices in OpenAI response".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason != "stop" {
                tracing::warn!("OpenAI completion finished with reason '{}'", reason);
            }
        }

        match choice.message.content {
            Some(ChatMessageContent::Text(text)) => Ok(text),
            _ => Err(Error::AiProvider(
                "No text content in OpenAI response".to_string(),
            )),
        }
    }
}
