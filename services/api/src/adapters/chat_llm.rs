//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the confession bot's chat model.
//! It implements the `ChatCompletionService` port from the `core` crate against any
//! OpenAI-compatible server, typically a local llama.cpp server.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use karma_core::{
    domain::{ChatMessage, ChatRole},
    ports::{ChatCompletionService, PortError, PortResult},
    SamplingParams,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn to_request_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
        let content = message.content.as_str();
        let built: ChatCompletionRequestMessage = match message.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        };
        Ok(built)
    }
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiChatAdapter {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> PortResult<String> {
        let messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<PortResult<Vec<_>>>()?;
        debug!(count = messages.len(), model = %self.model, "Requesting chat completion");

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(params.temperature)
            .max_tokens(params.max_tokens)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Map the error by hand, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Chat model returned no reply content.".to_string())
            })
    }
}
