//! OpenAI 兼容 API 适配器
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url），
//! 以 create_stream 获取真实的增量 delta，映射为片段流。

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use futures_util::StreamExt;

use crate::core::{Message, Role};
use crate::llm::traits::{ChatProvider, CursorPosition, FragmentStream};

/// OpenAI 兼容供应商：持有 Client 与 model 名
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn to_openai_messages(
        &self,
        context: &str,
        transcript: &[Message],
        user_response: &str,
    ) -> Vec<ChatCompletionRequestMessage> {
        let mut messages = Vec::with_capacity(transcript.len() + 2);

        if !context.is_empty() {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(context.to_string())
                    .build()
                    .unwrap(),
            ));
        }

        for m in transcript {
            messages.push(match m.role {
                Role::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
            });
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_response.to_string())
                .build()
                .unwrap(),
        ));

        messages
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn run_chat(
        &self,
        context: &str,
        transcript: &[Message],
        user_response: &str,
        _cursor: CursorPosition,
    ) -> Result<FragmentStream, String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_openai_messages(context, transcript, user_response))
            .stream(true)
            .build()
            .map_err(|e| e.to_string())?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| e.to_string())?;

        let fragments = stream.filter_map(|item| async move {
            match item {
                Ok(resp) => resp
                    .choices
                    .first()
                    .and_then(|c| c.delta.content.clone())
                    .map(Ok),
                Err(e) => Some(Err(e.to_string())),
            }
        });

        Ok(Box::pin(fragments))
    }
}
