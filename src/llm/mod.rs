//! 补全供应商层：能力抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use crate::config::AppConfig;

pub use mock::MockChatProvider;
pub use openai::OpenAiProvider;
pub use traits::{ChatProvider, CursorPosition, FragmentStream};

/// 根据配置与环境变量选择补全后端（OpenAI 兼容端点 / Mock）
pub fn create_provider_from_config(cfg: &AppConfig) -> Arc<dyn ChatProvider> {
    let provider = cfg.llm.provider.to_lowercase();
    if provider == "openai" && std::env::var("OPENAI_API_KEY").is_ok() {
        tracing::info!("Using OpenAI-compatible provider ({})", cfg.llm.model);
        Arc::new(OpenAiProvider::new(
            cfg.llm.base_url.as_deref(),
            &cfg.llm.model,
            std::env::var("OPENAI_API_KEY").ok().as_deref(),
        ))
    } else {
        if provider != "mock" {
            tracing::warn!("No API key set or provider unknown, using Mock provider");
        }
        Arc::new(MockChatProvider::new())
    }
}
