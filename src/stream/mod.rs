//! 流式响应聚合器
//!
//! 消费一条惰性、有限、不可重启的片段流，把片段累积成单个增长的字符串，
//! 每个片段之后发布一次携带当前累积文本的进度通知（done_streaming=false）。
//! 「追加 + 通知」在聚合器生命周期内唯一的一把锁下执行：同一实例上的
//! 两条并发流不可能把部分状态交错成乱序的通知序列。
//! 不做重试：流中途失败时丢弃已累积文本，以 Stream 错误向调用方传播。

use futures_util::StreamExt;
use tokio::sync::Mutex;

use crate::core::AgentError;
use crate::llm::FragmentStream;
use crate::rpc::{Progress, RpcCorrelator};

/// 聚合器：持有进度发布的临界区锁（构造一次，复用至实例销毁）
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    publish_lock: Mutex<()>,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 逐片段累积并发布进度；流耗尽后返回完整文本，由调用方标记所属任务完成
    pub async fn aggregate(
        &self,
        mut fragments: FragmentStream,
        rpc: &RpcCorrelator,
    ) -> Result<String, AgentError> {
        let mut response = String::new();

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(AgentError::Stream)?;

            // 临界区覆盖「追加 + 通知」，在下一次片段挂起点之前释放
            let _guard = self.publish_lock.lock().await;
            response.push_str(&fragment);
            rpc.send_progress(Progress::streaming(response.clone())).await?;
        }

        Ok(response)
    }
}
