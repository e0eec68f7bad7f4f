//! Mock 补全供应商（用于测试与无 Key 环境）
//!
//! 可预置若干条脚本化的片段序列，按 run_chat 调用顺序消费；
//! 脚本耗尽后回显用户回复为单片段流，便于本地跑通完整编排。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;

use crate::core::Message;
use crate::llm::traits::{ChatProvider, CursorPosition, FragmentStream};

/// Mock 供应商：脚本化片段流 + 回显兜底
#[derive(Debug, Default)]
pub struct MockChatProvider {
    scripts: Mutex<VecDeque<Vec<String>>>,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置下一次 run_chat 返回的片段序列
    pub fn queue_fragments(&self, fragments: Vec<&str>) {
        self.scripts
            .lock()
            .unwrap()
            .push_back(fragments.into_iter().map(String::from).collect());
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn run_chat(
        &self,
        _context: &str,
        _transcript: &[Message],
        user_response: &str,
        _cursor: CursorPosition,
    ) -> Result<FragmentStream, String> {
        let fragments = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![format!("Echo: {}", user_response)]);

        Ok(Box::pin(stream::iter(fragments.into_iter().map(Ok))))
    }
}
