//! 补全供应商抽象
//!
//! run_chat 返回一条惰性、有限、不可重启的片段流（耗尽后不可再迭代）；
//! 片段按序投递，流错误以 Err 项表达，由聚合器转换为 Stream 错误。

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::core::Message;

/// 单条流式响应的片段流
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, String>> + Send>>;

/// 文档中的光标位置（补全供应商接口的一部分，核心不解释其含义）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: u32,
    pub character: u32,
}

/// 补全供应商 trait：携带转录与用户回复发起一次流式补全
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn run_chat(
        &self,
        context: &str,
        transcript: &[Message],
        user_response: &str,
        cursor: CursorPosition,
    ) -> Result<FragmentStream, String>;
}
